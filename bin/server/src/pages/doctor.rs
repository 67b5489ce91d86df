//! Doctor dashboard page.

use leptos::prelude::*;
use telemedica_identity::Role;

use crate::app::DashboardGuard;

/// Doctor dashboard, gated to the doctor role.
#[component]
pub fn DoctorDashboardPage() -> impl IntoView {
    view! {
        <DashboardGuard required=Role::Doctor>
            <DoctorDashboard/>
        </DashboardGuard>
    }
}

#[component]
fn DoctorDashboard() -> impl IntoView {
    view! {
        <div class="dashboard doctor-dashboard">
            <h1>"Consultation queue"</h1>

            <section class="dashboard-section">
                <h2>"Waiting patients"</h2>
                <p class="empty-state">"No patients in the queue right now."</p>
            </section>

            <section class="dashboard-section">
                <h2>"Today's schedule"</h2>
                <p class="empty-state">"Scheduled consultations will appear here."</p>
            </section>
        </div>
    }
}
