use client::ThemeStore;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::Event;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::YewduxRoot;

use crate::{
    browser::{self, DARK_SCHEME_QUERY, Shared, log_warning},
    components::Toaster,
    routes::{Route, switch},
};

#[function_component(App)]
pub fn app() -> Html {
    let client = use_state(browser::build_client);
    let theme = use_state(browser::build_theme_store);

    use_color_scheme_listener(&theme);

    let content = match &*client {
        Ok(client) => {
            let client = client.clone();
            let theme = (*theme).clone();
            html! {
                <BrowserRouter>
                    <Switch<Route> render={move |route| switch(route, &client, &theme)} />
                </BrowserRouter>
            }
        }
        Err(err) => html! {
            <div class="alert alert-error m-6">
                <span>{format!("Console cannot start: {err}")}</span>
            </div>
        },
    };

    html! {
        <YewduxRoot>
            <Toaster />
            {content}
        </YewduxRoot>
    }
}

/// Re-applies the `system` theme when the OS colour scheme flips.
#[hook]
fn use_color_scheme_listener(theme: &Shared<ThemeStore>) {
    use_effect_with(theme.clone(), |theme| {
        let query = web_sys::window().and_then(|window| window.match_media(DARK_SCHEME_QUERY).ok().flatten());
        let theme = theme.clone();
        let listener = Closure::<dyn Fn(Event)>::new(move |_: Event| theme.color_scheme_changed());

        if let Some(query) = &query
            && let Err(err) = query
                .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        {
            log_warning(&format!("cannot watch the colour scheme: {err:?}"));
        }

        move || {
            if let Some(query) = query {
                let _ = query.remove_event_listener_with_callback(
                    "change",
                    listener.as_ref().unchecked_ref(),
                );
            }
        }
    });
}
