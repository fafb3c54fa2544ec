use client::ConsoleClient;
use shared::models::VersionInfo;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::browser::Shared;

#[derive(Properties, PartialEq)]
pub struct DashboardPageProps {
    pub client: Shared<ConsoleClient>,
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &DashboardPageProps) -> Html {
    let user = props.client.session().users().state();
    let version = use_state(|| None::<VersionInfo>);

    {
        let client = props.client.clone();
        let version = version.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                match client.version_info().await {
                    Ok(info) => version.set(Some(info)),
                    Err(err) => crate::browser::log_warning(&format!("version info unavailable: {err}")),
                }
            });
            || ()
        });
    }

    let Some(userinfo) = user.userinfo else {
        return html! {};
    };

    html! {
        <div class="p-6 flex flex-col gap-6">
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h2 class="card-title">{format!("Welcome, {}", userinfo.display_name())}</h2>
                    <dl class="grid grid-cols-[8rem_1fr] gap-y-1 text-sm">
                        if let Some(email) = &userinfo.email {
                            <dt class="opacity-70">{"Email"}</dt><dd>{email.clone()}</dd>
                        }
                        if let Some(phone) = &userinfo.phone {
                            <dt class="opacity-70">{"Phone"}</dt><dd>{phone.clone()}</dd>
                        }
                        <dt class="opacity-70">{"Role"}</dt>
                        <dd>{user.role.clone().unwrap_or_default()}</dd>
                    </dl>
                </div>
            </div>
            if let Some(info) = &*version {
                <div class="text-xs opacity-60">
                    {format!("Backend {} ({} {})", info.version, info.git_branch, info.git_commit)}
                </div>
            }
        </div>
    }
}
