//! Administrator dashboard page.

use leptos::prelude::*;
use telemedica_identity::Role;

use crate::app::DashboardGuard;

/// Platform status for the administrator overview.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlatformStatus {
    pub identity_provider_ok: bool,
}

/// Server function returning platform health, administrator only.
#[server]
pub async fn get_platform_status() -> Result<PlatformStatus, ServerFnError> {
    use crate::auth::client::HttpIdentityProvider;
    use crate::server_helpers::require_role;
    use std::sync::Arc;

    require_role(Role::Administrator)
        .await
        .map_err(|e| e.into_server_error())?;

    let provider = leptos_axum::extract::<axum::Extension<Arc<HttpIdentityProvider>>>()
        .await?
        .0;

    Ok(PlatformStatus {
        identity_provider_ok: provider.health().await.is_ok(),
    })
}

/// Administrator dashboard, gated to the administrator role.
#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! {
        <DashboardGuard required=Role::Administrator>
            <AdminDashboard/>
        </DashboardGuard>
    }
}

#[component]
fn AdminDashboard() -> impl IntoView {
    let status = Resource::new(|| (), |_| get_platform_status());

    view! {
        <div class="dashboard admin-dashboard">
            <h1>"Platform administration"</h1>

            <section class="dashboard-section">
                <h2>"Status"</h2>
                <Suspense fallback=move || view! { <p>"Checking platform status..."</p> }>
                    {move || {
                        status.get().map(|result| {
                            match result {
                                Ok(status) if status.identity_provider_ok => view! {
                                    <p class="status-ok">"Identity provider: reachable"</p>
                                }.into_any(),
                                Ok(_) => view! {
                                    <p class="status-degraded">"Identity provider: unreachable"</p>
                                }.into_any(),
                                Err(_) => view! {
                                    <p class="error">"Failed to load platform status."</p>
                                }.into_any(),
                            }
                        })
                    }}
                </Suspense>
            </section>

            <section class="dashboard-section">
                <h2>"Accounts"</h2>
                <p>"Account roles are managed in the identity provider's console. Changes take effect the next time the user signs in."</p>
            </section>
        </div>
    }
}
