//! Page components for the application.
//!
//! Each page is a Leptos component that renders a specific route,
//! along with any server functions specific to that page.

pub mod admin;
pub mod doctor;
pub mod home;
pub mod patient;
pub mod sign_in;
pub mod sign_up;

// Re-export all page components for convenient access
pub use admin::AdminDashboardPage;
pub use doctor::DoctorDashboardPage;
pub use home::HomePage;
pub use patient::PatientDashboardPage;
pub use sign_in::SignInPage;
pub use sign_up::SignUpPage;
