use client::ConsoleClient;
use shared::models::{AuthMethod, LdapLoginRequest, LoginRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

use super::{bind_input, complete_login};
use crate::{browser::Shared, config, routes::Route};

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
    pub client: Shared<ConsoleClient>,
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let identifier = use_state(String::new);
    let password = use_state(String::new);
    let use_ldap = use_state(|| false);
    let loading = use_state(|| false);
    let ldap_provider = config::ldap_provider();

    let onsubmit = {
        let client = props.client.clone();
        let identifier = identifier.clone();
        let password = password.clone();
        let use_ldap = use_ldap.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let client = client.clone();
            let identifier = (*identifier).trim().to_string();
            let password = (*password).clone();
            let ldap = ldap_provider.filter(|_| *use_ldap);
            let loading = loading.clone();
            loading.set(true);

            spawn_local(async move {
                let result = match ldap {
                    Some(provider) => {
                        client
                            .login_with_ldap(
                                provider,
                                &LdapLoginRequest {
                                    username: identifier,
                                    password,
                                },
                            )
                            .await
                    }
                    None => {
                        let (email, username) = if identifier.contains('@') {
                            (Some(identifier), None)
                        } else {
                            (None, Some(identifier))
                        };
                        client
                            .login(&LoginRequest {
                                email,
                                username,
                                password,
                                auth_method: Some(AuthMethod::Standard),
                            })
                            .await
                    }
                };
                loading.set(false);
                match result {
                    Ok(response) => complete_login(&client, &response),
                    Err(err) => client.platform().notifier.error(&err.to_string()),
                }
            });
        })
    };

    let oauth_buttons = config::oauth_providers().into_iter().map(|provider| {
        let client = props.client.clone();
        let label = format!("Continue with {provider}");
        let onclick = Callback::from(move |_: MouseEvent| {
            let redirect_uri = format!("{}/auth/callback/{provider}", page_origin());
            let href = client.authorize_url(&provider, &redirect_uri);
            client.platform().navigator.assign(&href);
        });
        html! {
            <button type="button" class="btn btn-outline w-full" {onclick}>{label}</button>
        }
    });

    let toggle_ldap = {
        let use_ldap = use_ldap.clone();
        Callback::from(move |_: Event| use_ldap.set(!*use_ldap))
    };

    let busy = *loading;
    let disable_submit = identifier.trim().is_empty() || password.is_empty() || busy;
    let identifier_label = if *use_ldap { "Username" } else { "Email or username" };

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{"Sign in"}</h2>
                    <div class="form-control">
                        <label class="label" for="identifier">
                            <span class="label-text">{identifier_label}</span>
                        </label>
                        <input
                            id="identifier"
                            class="input input-bordered"
                            type="text"
                            autocomplete="username"
                            required=true
                            value={(*identifier).clone()}
                            oninput={bind_input(&identifier)}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{"Password"}</span>
                        </label>
                        <input
                            id="password"
                            class="input input-bordered"
                            type="password"
                            autocomplete="current-password"
                            required=true
                            value={(*password).clone()}
                            oninput={bind_input(&password)}
                        />
                    </div>
                    if let Some(provider) = ldap_provider {
                        <label class="label cursor-pointer justify-start gap-2">
                            <input type="checkbox" class="checkbox checkbox-sm" checked={*use_ldap} onchange={toggle_ldap} />
                            <span class="label-text">{format!("Sign in with {provider} (LDAP)")}</span>
                        </label>
                    }
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                            {if busy { "Signing in..." } else { "Sign in" }}
                        </button>
                    </div>
                    <div class="divider">{"or"}</div>
                    <div class="flex flex-col gap-2">
                        { for oauth_buttons }
                    </div>
                    <p class="text-sm text-center mt-4">
                        {"No account yet? "}
                        <Link<Route> to={Route::Register} classes="link link-primary">{"Create one"}</Link<Route>>
                    </p>
                </form>
            </div>
        </div>
    }
}

fn page_origin() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}
