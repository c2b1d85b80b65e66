//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence so route handlers can
//! stay focused on request parsing, auth plumbing and status mapping.

pub mod ai;
pub mod login_link;
pub mod session;
pub mod work_log;
