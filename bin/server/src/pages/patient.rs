//! Patient dashboard page.

use leptos::prelude::*;
use telemedica_identity::Role;

use crate::app::{DashboardGuard, get_current_user};

/// Patient dashboard, gated to the patient role.
#[component]
pub fn PatientDashboardPage() -> impl IntoView {
    view! {
        <DashboardGuard required=Role::Patient>
            <PatientDashboard/>
        </DashboardGuard>
    }
}

#[component]
fn PatientDashboard() -> impl IntoView {
    let user = Resource::new(|| (), |_| get_current_user());

    view! {
        <div class="dashboard patient-dashboard">
            <Suspense fallback=move || view! { <h1>"Your care"</h1> }>
                {move || {
                    user.get().map(|result| {
                        let greeting = result
                            .ok()
                            .flatten()
                            .and_then(|u| u.full_name)
                            .map(|name| format!("Welcome back, {}", name))
                            .unwrap_or_else(|| "Your care".to_string());
                        view! { <h1>{greeting}</h1> }
                    })
                }}
            </Suspense>

            <section class="dashboard-section">
                <h2>"Upcoming appointments"</h2>
                <p class="empty-state">"No appointments scheduled. Book a video visit to get started."</p>
                <a href="#" class="cta-button">"Book a visit"</a>
            </section>

            <section class="dashboard-section">
                <h2>"Your prescriptions"</h2>
                <p class="empty-state">"Active prescriptions will appear here after your first visit."</p>
            </section>
        </div>
    }
}
