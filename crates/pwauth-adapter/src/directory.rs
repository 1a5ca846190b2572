//! Access to the operating system's account and group databases.

use crate::account::AccountRecord;
use async_trait::async_trait;
use pwauth_core::{Error, Result};
use std::process::Stdio;
use tokio::process::Command;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait SystemDirectory: Send + Sync {
    /// Looks up an account by login. `Ok(None)` means no such account.
    fn account(&self, username: &str) -> Result<Option<AccountRecord>>;

    /// Raw stdout of the group-listing utility for `username`.
    async fn group_listing(&self, username: &str) -> Result<String>;
}

/// Directory backed by `getpwnam(3)` and the `groups` utility.
pub(crate) struct OsDirectory {
    groups_command: String,
}

impl OsDirectory {
    pub(crate) fn new(groups_command: impl Into<String>) -> Self {
        Self {
            groups_command: groups_command.into(),
        }
    }
}

#[async_trait]
impl SystemDirectory for OsDirectory {
    fn account(&self, username: &str) -> Result<Option<AccountRecord>> {
        nix::unistd::User::from_name(username)
            .map(|user| user.map(AccountRecord::from))
            .map_err(|errno| Error::Io(format!("account lookup for `{username}` failed: {errno}")))
    }

    async fn group_listing(&self, username: &str) -> Result<String> {
        // Passed as its own argv element, never through a shell; `--` keeps a leading `-`
        // in the login from being read as an option.
        let output = Command::new(&self.groups_command)
            .arg("--")
            .arg(username)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| Error::SpawnError {
                command: self.groups_command.clone(),
                message: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::ExternalCommand {
                command: self.groups_command.clone(),
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
