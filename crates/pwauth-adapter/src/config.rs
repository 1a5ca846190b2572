//! Configuration types for the pwauth adapter.

use pwauth_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

/// Conventional install location of the `pwauth` helper.
pub const DEFAULT_AUTHENTICATOR_PATH: &str = "/usr/sbin/pwauth";
/// System account table used for bulk listing.
pub const DEFAULT_ACCOUNT_FILE: &str = "/etc/passwd";
/// Utility that prints `user : group...` for a login.
pub const DEFAULT_GROUPS_COMMAND: &str = "groups";

/// Configuration for the pwauth adapter.
///
/// Hosts may deserialize this from their own settings format; [`PwauthAdapter::new`]
/// validates it again before use.
///
/// [`PwauthAdapter::new`]: crate::PwauthAdapter::new
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AdapterConfig {
    /// Authenticator executable; reads username and password on stdin.
    pub authenticator_path: PathBuf,

    /// Optional flat account file enabling bulk listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_file: Option<PathBuf>,

    /// Group-listing utility, resolved through `PATH` when not absolute.
    #[validate(length(min = 1))]
    #[serde(default = "default_groups_command")]
    pub groups_command: String,

    /// Kill the authenticator after this many seconds. Unset waits indefinitely.
    #[validate(range(min = 1, max = 3600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_timeout_secs: Option<u64>,
}

fn default_groups_command() -> String {
    DEFAULT_GROUPS_COMMAND.to_string()
}

impl AdapterConfig {
    /// Creates a configuration for the given authenticator with no account file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if validation fails.
    pub fn new(authenticator_path: impl Into<PathBuf>) -> Result<Self> {
        let config = Self {
            authenticator_path: authenticator_path.into(),
            account_file: None,
            groups_command: default_groups_command(),
            authenticator_timeout_secs: None,
        };
        config.validated()
    }

    /// Validates the configuration and hands it back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first failing field.
    pub fn validated(self) -> Result<Self> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Sets the flat account file.
    #[must_use]
    pub fn with_account_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.account_file = Some(path.into());
        self
    }

    /// Overrides the group-listing utility.
    #[must_use]
    pub fn with_groups_command(mut self, command: impl Into<String>) -> Self {
        self.groups_command = command.into();
        self
    }

    /// Sets the authenticator timeout in seconds.
    #[must_use]
    pub const fn with_authenticator_timeout_secs(mut self, seconds: u64) -> Self {
        self.authenticator_timeout_secs = Some(seconds);
        self
    }

    /// Returns the authenticator timeout, if any.
    #[must_use]
    pub fn authenticator_timeout(&self) -> Option<Duration> {
        self.authenticator_timeout_secs.map(Duration::from_secs)
    }

    /// Returns the account file path, if configured.
    #[must_use]
    pub fn account_file(&self) -> Option<&Path> {
        self.account_file.as_deref()
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            authenticator_path: PathBuf::from(DEFAULT_AUTHENTICATOR_PATH),
            account_file: Some(PathBuf::from(DEFAULT_ACCOUNT_FILE)),
            groups_command: default_groups_command(),
            authenticator_timeout_secs: None,
        }
    }
}
