use client::{ConsoleClient, RegisterForm};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

use super::bind_input;
use crate::{browser::Shared, routes::Route};

#[derive(Properties, PartialEq)]
pub struct RegisterPageProps {
    pub client: Shared<ConsoleClient>,
}

#[function_component(RegisterPage)]
pub fn register_page(props: &RegisterPageProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let loading = use_state(|| false);

    let onsubmit = {
        let client = props.client.clone();
        let email = email.clone();
        let password = password.clone();
        let confirm_password = confirm_password.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let client = client.clone();
            let form = RegisterForm {
                email: (*email).clone(),
                password: (*password).clone(),
                confirm_password: (*confirm_password).clone(),
            };
            let loading = loading.clone();
            loading.set(true);

            spawn_local(async move {
                let result = client.register_account(&form).await;
                loading.set(false);
                let platform = client.platform();
                match result {
                    Ok(_) => {
                        platform
                            .notifier
                            .success("Registration successful!", Some("Please login to continue."));
                        platform.navigator.navigate(client::session::LOGIN_PATH);
                    }
                    Err(err) => platform.notifier.error(&err.to_string()),
                }
            });
        })
    };

    let busy = *loading;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{"Create your account"}</h2>
                    <div class="form-control">
                        <label class="label" for="email">
                            <span class="label-text">{"Email"}</span>
                        </label>
                        <input
                            id="email"
                            class="input input-bordered"
                            type="email"
                            autocomplete="email"
                            required=true
                            disabled={busy}
                            value={(*email).clone()}
                            oninput={bind_input(&email)}
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
                            autocomplete="new-password"
                            required=true
                            disabled={busy}
                            value={(*password).clone()}
                            oninput={bind_input(&password)}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="confirm-password">
                            <span class="label-text">{"Confirm password"}</span>
                        </label>
                        <input
                            id="confirm-password"
                            class="input input-bordered"
                            type="password"
                            autocomplete="new-password"
                            required=true
                            disabled={busy}
                            value={(*confirm_password).clone()}
                            oninput={bind_input(&confirm_password)}
                        />
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={busy}>
                            {if busy { "Creating account..." } else { "Create account" }}
                        </button>
                    </div>
                    <p class="text-sm text-center mt-4">
                        {"Already registered? "}
                        <Link<Route> to={Route::Login} classes="link link-primary">{"Sign in"}</Link<Route>>
                    </p>
                </form>
            </div>
        </div>
    }
}
