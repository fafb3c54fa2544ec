mod auth_callback;
mod dashboard;
mod login;
mod not_found;
mod register;

pub use auth_callback::AuthCallbackPage;
pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use register::RegisterPage;

use client::{ConsoleClient, session::LOGIN_FALLBACK_URL_KEY};
use shared::models::LoginResponse;
use web_sys::HtmlInputElement;
use yew::{Callback, InputEvent, TargetCast, UseStateHandle};

/// Stores a successful login and leaves the sign-in pages, returning to the
/// page the guard sent the user away from when there is one.
pub(crate) fn complete_login(client: &ConsoleClient, response: &LoginResponse) {
    client.session().confirm(response);
    let platform = client.platform();
    match platform.storage.get(LOGIN_FALLBACK_URL_KEY) {
        Some(href) => {
            platform.storage.remove(LOGIN_FALLBACK_URL_KEY);
            platform.navigator.assign(&href);
        }
        None => platform.navigator.navigate("/"),
    }
}

/// `oninput` handler writing the input's value into `state`.
pub(crate) fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
            state.set(input.value());
        }
    })
}
