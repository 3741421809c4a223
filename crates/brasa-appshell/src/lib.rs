//! # brasa-appshell
//!
//! Page-process controllers for the installable web app: the
//! install-prompt manager and the service-worker controller (registration
//! lifecycle, version takeover, navigation interception, push-message
//! routing).
//!
//! Browser APIs are reached only through the traits in [`platform`], so
//! every state machine here runs and tests headlessly.

pub mod install;
pub mod platform;
pub mod worker;

pub use install::manager::{InstallOutcome, InstallPromptManager};
pub use worker::controller::ServiceWorkerController;
