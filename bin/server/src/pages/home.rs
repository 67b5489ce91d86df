//! Public landing page.

use leptos::prelude::*;

use crate::app::get_current_user;

/// Marketing landing page: service overview plus a call to action that
/// adapts to whether a user is signed in.
#[component]
pub fn HomePage() -> impl IntoView {
    let user = Resource::new(|| (), |_| get_current_user());

    view! {
        <div class="home-page">
            <section class="hero">
                <h1>"Healthcare, wherever you are"</h1>
                <p>"TeleMedica connects you with licensed clinicians for video visits, prescriptions, and follow-up care."</p>
                <Suspense fallback=move || view! { <span class="cta-placeholder"></span> }>
                    {move || {
                        user.get().map(|result| {
                            match result {
                                Ok(Some(current)) => view! {
                                    <a href=current.role.dashboard_path() class="cta-button">"Go to your dashboard"</a>
                                }.into_any(),
                                _ => view! {
                                    <div class="cta-group">
                                        <a href="/sign-up" class="cta-button">"Get started"</a>
                                        <a href="/sign-in" class="cta-link">"Sign in"</a>
                                    </div>
                                }.into_any(),
                            }
                        })
                    }}
                </Suspense>
            </section>

            <section class="services">
                <h2>"What we offer"</h2>
                <ul class="service-list">
                    <li>
                        <h3>"Video consultations"</h3>
                        <p>"See a clinician from home, usually within the hour."</p>
                    </li>
                    <li>
                        <h3>"Prescription renewals"</h3>
                        <p>"Renew ongoing prescriptions without a waiting room."</p>
                    </li>
                    <li>
                        <h3>"Follow-up care"</h3>
                        <p>"Message your care team between appointments."</p>
                    </li>
                </ul>
            </section>
        </div>
    }
}
