use client::{ConsoleClient, ThemeStore, session::is_public_path};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{
    browser::Shared,
    components::{AuthGuard, Header},
    pages::{AuthCallbackPage, DashboardPage, LoginPage, NotFoundPage, RegisterPage},
};

#[derive(Debug, Clone, PartialEq, Eq, Routable)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/auth/callback/:provider")]
    AuthCallback { provider: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Whether the route renders without a session.
    pub fn is_public(&self) -> bool {
        is_public_path(&self.to_path())
    }
}

/// Renders `route`; protected routes sit behind the auth guard and the
/// application header.
pub fn switch(route: Route, client: &Shared<ConsoleClient>, theme: &Shared<ThemeStore>) -> Html {
    let client = client.clone();
    match route {
        Route::Login => html! { <LoginPage {client} /> },
        Route::Register => html! { <RegisterPage {client} /> },
        Route::AuthCallback { provider } => html! {
            <AuthCallbackPage {client} {provider} />
        },
        protected => {
            let path = protected.to_path();
            let page = match protected {
                Route::Dashboard => html! { <DashboardPage client={client.clone()} /> },
                _ => html! { <NotFoundPage /> },
            };
            html! {
                <AuthGuard client={client.clone()} {path}>
                    <Header {client} theme={theme.clone()} />
                    <main>{page}</main>
                </AuthGuard>
            }
        }
    }
}
