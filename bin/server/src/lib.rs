//! TeleMedica web server and UI.
//!
//! This crate provides the Leptos-based web portal for the TeleMedica
//! telehealth platform: the public marketing pages, the sign-in/sign-up
//! flow against the hosted identity provider, and the role-gated
//! dashboard areas.

#![allow(non_snake_case)]

pub mod app;
pub mod pages;

#[cfg(feature = "ssr")]
pub mod auth;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod error;
#[cfg(feature = "ssr")]
pub mod server_helpers;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
