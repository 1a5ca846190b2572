//! # pwauth-core
//!
//! Host-facing contract for authentication adapters that delegate password checks to an
//! external system authenticator.
//!
//! This crate defines what a host sees: the backend trait, the capability flags an
//! adapter reports, the user record shape and the bulk-listing filter.
//!
//! ## Modules
//!
//! - [`backend`] - The [`AuthBackend`] trait hosts call into
//! - [`capabilities`] - Capability flags reported at initialization
//! - [`error`] - Error types and stable error codes
//! - [`filter`] - Field/pattern filters for bulk user listing
//! - [`types`] - Credentials, user records and ordered listing results

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod capabilities;
pub mod error;
pub mod filter;
pub mod types;

// Re-export commonly used types
pub use backend::AuthBackend;
pub use capabilities::{Capabilities, Capability};
pub use error::{Error, Result};
pub use filter::{FilterField, UserFilter};
pub use types::{Credential, RetrievedUsers, UserInfo};
