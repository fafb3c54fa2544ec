use client::{ConsoleClient, ThemeStore};
use wasm_bindgen_futures::spawn_local;
use yew::{Callback, Html, Properties, function_component, html};

use super::ThemeSwitcher;
use crate::browser::Shared;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub client: Shared<ConsoleClient>,
    pub theme: Shared<ThemeStore>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let user = props.client.session().users().state();

    let logout = {
        let client = props.client.clone();
        Callback::from(move |_: yew::MouseEvent| {
            let client = client.clone();
            spawn_local(async move {
                // Local state is cleared whatever the server answers.
                let _ = client.sign_out().await;
                client.platform().navigator.navigate(client::session::LOGIN_PATH);
            });
        })
    };

    html! {
        <header class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1">
                <a class="text-xl font-semibold" href="/">{"Console"}</a>
            </div>
            <div class="flex-none flex items-center gap-2">
                <ThemeSwitcher store={props.theme.clone()} />
                if let Some(userinfo) = &user.userinfo {
                    <span class="text-sm">{userinfo.display_name().to_string()}</span>
                    if let Some(role) = &user.role {
                        <span class="badge badge-outline">{role.clone()}</span>
                    }
                    <button class="btn btn-ghost btn-sm" onclick={logout}>{"Sign out"}</button>
                }
            </div>
        </header>
    }
}
