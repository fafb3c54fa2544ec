//! Browser front end for the Console backend.

mod app;
mod browser;
mod components;
mod config;
mod pages;
mod routes;
mod state;

use app::App;
use yew::Renderer;

fn main() {
    // Keep panic payloads readable in the browser console.
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        let location = info
            .location()
            .map(|location| format!(" at {}:{}:{}", location.file(), location.line(), location.column()))
            .unwrap_or_default();
        web_sys::console::error_1(&format!("Panic: {payload}{location}").into());
    }));

    web_sys::console::log_1(&"Starting Console".into());

    match web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    {
        Some(body) => {
            Renderer::<App>::with_root(body.into()).render();
        }
        None => web_sys::console::error_1(&"Console needs a document body to mount".into()),
    }
}
