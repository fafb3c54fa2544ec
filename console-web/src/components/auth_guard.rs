//! Renders its children only once the session is confirmed.

use client::{ConsoleClient, GuardOutcome, session::guard::AuthGuard as SessionGuard};
use wasm_bindgen_futures::spawn_local;
use yew::{AttrValue, Html, Properties, function_component, html, use_effect_with, use_memo, use_state};

use super::Loading;
use crate::browser::Shared;

#[derive(Properties, PartialEq)]
pub struct AuthGuardProps {
    pub client: Shared<ConsoleClient>,
    /// Route being entered.
    pub path: AttrValue,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(AuthGuard)]
pub fn auth_guard(props: &AuthGuardProps) -> Html {
    let guard = use_memo(props.client.clone(), |client| {
        SessionGuard::new(ConsoleClient::clone(client))
    });
    let outcome = use_state(|| None::<GuardOutcome>);

    {
        let outcome = outcome.clone();
        use_effect_with(props.path.clone(), move |path| {
            let path = path.to_string();
            spawn_local(async move {
                let result = guard.check(&path).await;
                outcome.set(Some(result));
            });
            || ()
        });
    }

    match *outcome {
        Some(result) if result.may_render() => props.children.clone(),
        // The guard has already moved the router to the login page.
        Some(GuardOutcome::Redirected) => html! {},
        _ => html! { <Loading /> },
    }
}
