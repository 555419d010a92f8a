//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and collaborator I/O so route handlers
//! can stay focused on request/response translation and status mapping.

pub mod career;
pub mod extract;
pub mod profile;
pub mod roadmap;
