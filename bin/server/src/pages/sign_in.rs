//! Sign-in page component.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

/// Human-readable copy for the auth error codes the sign-in redirect
/// carries back.
fn error_message(code: &str) -> &'static str {
    match code {
        "invalid_credentials" => "Email or password is incorrect.",
        "provider_unreachable" => {
            "We could not reach the sign-in service. Please try again in a moment."
        }
        "duplicate_submission" => "A sign-in attempt is already in progress.",
        "session_expired" => "Your session expired. Please sign in again.",
        _ => "Sign-in failed. Please try again.",
    }
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "confirm_email" => {
            Some("Account created. Check your email to confirm it, then sign in.")
        }
        _ => None,
    }
}

/// Sign-in page: a plain form posted to the auth routes, with any
/// error/notice code from the last attempt rendered above it.
#[component]
pub fn SignInPage() -> impl IntoView {
    let query = use_query_map();
    let error = move || query.read().get("error").map(|code| error_message(&code));
    let notice = move || {
        query
            .read()
            .get("notice")
            .and_then(|code| notice_message(&code))
    };

    view! {
        <div class="auth-page">
            <div class="auth-box">
                <h1>"Sign in to TeleMedica"</h1>
                {move || notice().map(|msg| view! { <p class="notice">{msg}</p> })}
                {move || error().map(|msg| view! { <p class="error">{msg}</p> })}
                <form method="post" action="/auth/sign-in" class="auth-form">
                    <label for="email">"Email"</label>
                    <input type="email" id="email" name="email" required autocomplete="email"/>
                    <label for="password">"Password"</label>
                    <input
                        type="password"
                        id="password"
                        name="password"
                        required
                        autocomplete="current-password"
                    />
                    <button type="submit" class="auth-submit">"Sign in"</button>
                </form>
                <p class="auth-alt">
                    "New to TeleMedica? " <a href="/sign-up">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_auth_error_code_has_copy() {
        for code in [
            "invalid_credentials",
            "provider_unreachable",
            "duplicate_submission",
            "session_expired",
        ] {
            assert_ne!(error_message(code), "Sign-in failed. Please try again.");
        }
    }

    #[test]
    fn unknown_code_gets_generic_copy() {
        assert_eq!(error_message("bogus"), "Sign-in failed. Please try again.");
        assert!(notice_message("bogus").is_none());
    }
}
