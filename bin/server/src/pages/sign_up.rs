//! Sign-up page component.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

fn error_message(code: &str) -> &'static str {
    match code {
        "provider_unreachable" => {
            "We could not reach the sign-up service. Please try again in a moment."
        }
        "sign_up_rejected" => {
            "We could not create that account. The email may already be registered."
        }
        "duplicate_submission" => "A sign-up attempt is already in progress.",
        _ => "Sign-up failed. Please try again.",
    }
}

/// Sign-up page: collects profile details and the account tier, posted as
/// a plain form. Doctors self-select here; administrator accounts are
/// provisioned out of band.
#[component]
pub fn SignUpPage() -> impl IntoView {
    let query = use_query_map();
    let error = move || query.read().get("error").map(|code| error_message(&code));

    view! {
        <div class="auth-page">
            <div class="auth-box">
                <h1>"Create your TeleMedica account"</h1>
                {move || error().map(|msg| view! { <p class="error">{msg}</p> })}
                <form method="post" action="/auth/sign-up" class="auth-form">
                    <label for="full_name">"Full name"</label>
                    <input type="text" id="full_name" name="full_name" required autocomplete="name"/>
                    <label for="email">"Email"</label>
                    <input type="email" id="email" name="email" required autocomplete="email"/>
                    <label for="password">"Password"</label>
                    <input
                        type="password"
                        id="password"
                        name="password"
                        required
                        autocomplete="new-password"
                    />
                    <label for="role">"I am a"</label>
                    <select id="role" name="role">
                        <option value="patient" selected>"Patient"</option>
                        <option value="doctor">"Doctor"</option>
                    </select>
                    <button type="submit" class="auth-submit">"Create account"</button>
                </form>
                <p class="auth-alt">
                    "Already have an account? " <a href="/sign-in">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
