use client::ThemeStore;
use shared::models::Theme;
use yew::{Callback, Classes, Html, Properties, function_component, html, use_state};
use yew_icons::{Icon, IconId};

use crate::browser::Shared;

#[derive(Properties, PartialEq)]
pub struct ThemeSwitcherProps {
    pub store: Shared<ThemeStore>,
    #[prop_or_default]
    pub class: Classes,
}

/// Cycles light, dark and system.
#[function_component(ThemeSwitcher)]
pub fn theme_switcher(props: &ThemeSwitcherProps) -> Html {
    let current = use_state(|| props.store.theme());

    let cycle = {
        let store = props.store.clone();
        let current = current.clone();
        Callback::from(move |_: yew::MouseEvent| {
            let next = store.theme().next();
            store.set_theme(next);
            current.set(next);
        })
    };

    let icon = match *current {
        Theme::Light => IconId::HeroiconsSolidSun,
        Theme::Dark => IconId::HeroiconsSolidMoon,
        Theme::System => IconId::HeroiconsSolidComputerDesktop,
    };
    let label = format!("Theme: {} (click to change)", *current);

    html! {
        <div class={props.class.clone()}>
            <button class="btn btn-ghost btn-circle" onclick={cycle} aria-label={label.clone()} title={label}>
                <Icon icon_id={icon} class="h-5 w-5" />
            </button>
        </div>
    }
}
