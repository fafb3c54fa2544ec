use yew::{Html, function_component, html};
use yew_router::prelude::Link;

use crate::routes::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center flex-col">
                <h1 class="text-5xl font-bold">{"404"}</h1>
                <p>{"This page does not exist."}</p>
                <Link<Route> to={Route::Dashboard} classes="btn btn-primary">{"Go home"}</Link<Route>>
            </div>
        </div>
    }
}
