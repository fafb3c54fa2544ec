//! Toast notifications.
//!
//! The API client raises notifications from outside any component, so they
//! travel through a thread-local sink into the [`ToastState`] store once the
//! toaster has mounted. Notifications raised earlier are queued.

use std::cell::RefCell;
use yew::Callback;
use yewdux::Store;

/// Toasts shown at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 4;

/// How long a toast stays on screen.
pub const TOAST_TIMEOUT_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
}

/// A notification waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastRequest {
    pub kind: ToastKind,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u32,
    pub request: ToastRequest,
}

/// Toasts on screen, oldest first.
#[derive(Debug, Default, Clone, PartialEq, Eq, Store)]
pub struct ToastState {
    next_id: u32,
    pub toasts: Vec<Toast>,
}

impl ToastState {
    /// Adds a toast and returns its id.
    pub fn push(&mut self, request: ToastRequest) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.toasts.push(Toast { id, request });
        if self.toasts.len() > MAX_TOASTS {
            let overflow = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u32) {
        self.toasts.retain(|toast| toast.id != id);
    }
}

#[derive(Default)]
struct ToastSink {
    listener: Option<Callback<ToastRequest>>,
    queued: Vec<ToastRequest>,
}

thread_local! {
    static SINK: RefCell<ToastSink> = RefCell::new(ToastSink::default());
}

/// Shows a toast, or queues it until a toaster is connected.
pub fn notify(kind: ToastKind, title: &str, description: Option<&str>) {
    let request = ToastRequest {
        kind,
        title: title.to_string(),
        description: description.map(str::to_string),
    };
    let listener = SINK.with(|sink| {
        let mut sink = sink.borrow_mut();
        match &sink.listener {
            Some(listener) => Some(listener.clone()),
            None => {
                sink.queued.push(request.clone());
                None
            }
        }
    });
    // Emitted outside the borrow: the listener may notify again.
    if let Some(listener) = listener {
        listener.emit(request);
    }
}

/// Routes toasts to `listener`, flushing anything queued.
pub fn connect(listener: Callback<ToastRequest>) {
    let queued = SINK.with(|sink| {
        let mut sink = sink.borrow_mut();
        sink.listener = Some(listener.clone());
        std::mem::take(&mut sink.queued)
    });
    for request in queued {
        listener.emit(request);
    }
}

pub fn disconnect() {
    SINK.with(|sink| sink.borrow_mut().listener = None);
}
