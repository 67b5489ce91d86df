//! Main Leptos application component and routing.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    NavigateOptions,
    components::{Redirect, Route, Router, Routes},
    path,
};
use telemedica_identity::{GuardDecision, Role, SIGN_IN_PATH, evaluate};

use crate::pages::{
    AdminDashboardPage, DoctorDashboardPage, HomePage, PatientDashboardPage, SignInPage,
    SignUpPage,
};

/// The signed-in user as the UI sees them.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CurrentUser {
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
}

/// Server function to get the current user.
///
/// `Ok(None)` means nobody is signed in (no cookie, or a token the
/// provider no longer accepts). Only an unreachable provider is an error.
#[server]
pub async fn get_current_user() -> Result<Option<CurrentUser>, ServerFnError> {
    use crate::error::SessionError;
    use crate::server_helpers::current_identity;

    match current_identity().await {
        Ok(current) => Ok(Some(CurrentUser {
            email: current.identity.email().to_string(),
            full_name: current.identity.full_name().map(|s| s.to_string()),
            role: current.role,
        })),
        Err(SessionError::NotAuthenticated) | Err(SessionError::Expired) => Ok(None),
        Err(e) => Err(e.into_server_error()),
    }
}

/// The main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="TeleMedica"/>
        <Router>
            <Header/>
            <main class="container">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/sign-in") view=SignInPage/>
                    <Route path=path!("/sign-up") view=SignUpPage/>
                    <Route path=path!("/patient") view=PatientDashboardPage/>
                    <Route path=path!("/doctor") view=DoctorDashboardPage/>
                    <Route path=path!("/admin") view=AdminDashboardPage/>
                </Routes>
            </main>
        </Router>
    }
}

/// Header component with navigation and user menu.
#[component]
fn Header() -> impl IntoView {
    let user = Resource::new(|| (), |_| get_current_user());

    view! {
        <header class="header">
            <div class="header-left">
                <a href="/" class="logo">"TeleMedica"</a>
            </div>
            <div class="header-right">
                <Suspense fallback=move || view! { <span>"Loading..."</span> }>
                    {move || {
                        user.get().map(|result| {
                            match result {
                                Ok(Some(current)) => view! {
                                    <UserMenu current=current/>
                                }.into_any(),
                                _ => view! {
                                    <a href="/sign-in" class="sign-in-button">"Sign in"</a>
                                }.into_any(),
                            }
                        })
                    }}
                </Suspense>
            </div>
        </header>
    }
}

/// User menu with dashboard link and sign-out.
#[component]
fn UserMenu(current: CurrentUser) -> impl IntoView {
    let display_name = current
        .full_name
        .clone()
        .unwrap_or_else(|| current.email.clone());

    view! {
        <div class="user-menu">
            <span class="user-name">{display_name}</span>
            <div class="user-dropdown">
                <a href=current.role.dashboard_path()>"My dashboard"</a>
                <form method="post" action="/auth/sign-out" class="sign-out-form">
                    <button type="submit">"Sign out"</button>
                </form>
            </div>
        </div>
    }
}

/// Gate wrapping each role-scoped dashboard area.
///
/// Renders a waiting indicator until the session resolves, then either the
/// protected content or a replace-style redirect: anonymous visitors go to
/// the sign-in page, signed-in users of another role go to their own
/// dashboard. Replacement keeps the gated page out of the history stack.
#[component]
pub fn DashboardGuard(required: Role, children: ChildrenFn) -> impl IntoView {
    let user = Resource::new(|| (), |_| get_current_user());

    view! {
        <Suspense fallback=move || view! { <p class="guard-wait">"Checking your session..."</p> }>
            {move || {
                let children = children.clone();
                user.get().map(move |result| {
                    // An unreachable provider means no verified session;
                    // treat the visitor as anonymous rather than guessing.
                    let current = result.ok().flatten();
                    let decision = evaluate(
                        false,
                        current.is_some(),
                        current.map(|u| u.role),
                        required,
                    );
                    match decision {
                        GuardDecision::Allow => children().into_any(),
                        GuardDecision::Wait => view! {
                            <p class="guard-wait">"Checking your session..."</p>
                        }.into_any(),
                        decision => {
                            let path = decision.redirect_path().unwrap_or(SIGN_IN_PATH);
                            view! {
                                <Redirect
                                    path=path.to_string()
                                    options=NavigateOptions { replace: true, ..Default::default() }
                                />
                            }.into_any()
                        }
                    }
                })
            }}
        </Suspense>
    }
}
