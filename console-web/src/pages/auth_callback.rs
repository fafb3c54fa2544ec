use client::ConsoleClient;
use shared::models::{LoginResponse, OAuthCallbackParams};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{Link, use_location};

use super::complete_login;
use crate::{browser::Shared, components::Loading, routes::Route};

#[derive(Properties, PartialEq)]
pub struct AuthCallbackPageProps {
    pub client: Shared<ConsoleClient>,
    pub provider: AttrValue,
}

/// Landing page for identity providers: trades `code`/`state` for a session.
#[function_component(AuthCallbackPage)]
pub fn auth_callback_page(props: &AuthCallbackPageProps) -> Html {
    let params = use_location().map(|location| location.query::<OAuthCallbackParams>());
    let failure = use_state(|| None::<String>);

    {
        let client = props.client.clone();
        let failure = failure.clone();
        use_effect_with(props.provider.clone(), move |provider| {
            let provider = provider.to_string();
            match params {
                Some(Ok(params)) => spawn_local(async move {
                    match client
                        .handle_callback::<LoginResponse>(&provider, &params)
                        .await
                    {
                        Ok(response) => complete_login(&client, &response),
                        Err(err) => {
                            let message = err.to_string();
                            client.platform().notifier.error(&message);
                            failure.set(Some(message));
                        }
                    }
                }),
                _ => failure.set(Some("The sign-in link is missing its authorization code".into())),
            }
            || ()
        });
    }

    match &*failure {
        None => html! { <Loading /> },
        Some(message) => html! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="card w-full max-w-md shadow-lg bg-base-100">
                    <div class="card-body">
                        <h2 class="card-title">{format!("{} sign-in failed", props.provider)}</h2>
                        <div class="alert alert-error"><span>{message.clone()}</span></div>
                        <Link<Route> to={Route::Login} classes="btn btn-primary">{"Back to sign in"}</Link<Route>>
                    </div>
                </div>
            </div>
        },
    }
}
