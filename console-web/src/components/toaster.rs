use gloo_timers::callback::Timeout;
use yew::{Callback, Html, Properties, function_component, html, use_effect_with};
use yew_icons::{Icon, IconId};
use yewdux::prelude::use_store;

use crate::state::{self, TOAST_TIMEOUT_MS, Toast, ToastKind, ToastRequest, ToastState};

/// Shows notifications raised anywhere in the app.
#[function_component(Toaster)]
pub fn toaster() -> Html {
    let (toasts, dispatch) = use_store::<ToastState>();

    {
        let dispatch = dispatch.clone();
        use_effect_with((), move |()| {
            state::connect(Callback::from(move |request: ToastRequest| {
                dispatch.reduce_mut(|toasts| {
                    toasts.push(request);
                });
            }));
            state::disconnect
        });
    }

    let on_dismiss = Callback::from(move |id: u32| {
        dispatch.reduce_mut(|toasts| toasts.dismiss(id));
    });

    html! {
        <div class="toast toast-top toast-end z-50">
            { for toasts.toasts.iter().map(|toast| html! {
                <ToastItem key={toast.id} toast={toast.clone()} on_dismiss={on_dismiss.clone()} />
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    toast: Toast,
    on_dismiss: Callback<u32>,
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(props.toast.id, move |&id| {
            let timeout = Timeout::new(TOAST_TIMEOUT_MS, move || on_dismiss.emit(id));
            move || drop(timeout)
        });
    }

    let ToastRequest {
        kind,
        title,
        description,
    } = &props.toast.request;
    let (class, icon) = match kind {
        ToastKind::Error => ("alert alert-error", IconId::HeroiconsOutlineExclamationTriangle),
        ToastKind::Success => ("alert alert-success", IconId::HeroiconsOutlineCheck),
    };
    let dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        let id = props.toast.id;
        Callback::from(move |_: yew::MouseEvent| on_dismiss.emit(id))
    };

    html! {
        <div class={class} role="alert">
            <Icon icon_id={icon} class="h-5 w-5" />
            <div>
                <div class="font-semibold">{title.clone()}</div>
                if let Some(description) = description {
                    <div class="text-sm opacity-80">{description.clone()}</div>
                }
            </div>
            <button class="btn btn-ghost btn-xs" onclick={dismiss} aria-label="Dismiss">
                <Icon icon_id={IconId::HeroiconsOutlineXMark} class="h-4 w-4" />
            </button>
        </div>
    }
}
