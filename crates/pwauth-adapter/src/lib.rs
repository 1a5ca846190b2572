//! pwauth credential and directory adapter.
//!
//! This crate checks passwords by piping them to an external authenticator (such as
//! `pwauth`). It answers user and group queries from the POSIX account database, and
//! optionally lists users from a flat account file.

#![deny(missing_docs)]

mod account;
mod adapter;
mod authenticator;
mod config;
mod directory;
mod groups;
mod listing;

pub use account::{AccountRecord, AccountRecordError, NON_INTERACTIVE_SHELLS};
pub use adapter::PwauthAdapter;
pub use authenticator::AuthenticatorProcess;
pub use config::{
    AdapterConfig, DEFAULT_ACCOUNT_FILE, DEFAULT_AUTHENTICATOR_PATH, DEFAULT_GROUPS_COMMAND,
};
pub use groups::parse_group_listing;
pub use listing::Page;

/// Convenient result alias that reuses the core error type.
pub type Result<T> = pwauth_core::Result<T>;
