//! Runs the external authenticator executable.

use pwauth_core::{Credential, Error, Result};
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

/// External authenticator speaking the pwauth stdin protocol.
///
/// The program is started without arguments and receives the username and password on
/// stdin, one per line. Exit status zero means the credentials were accepted.
#[derive(Debug, Clone)]
pub struct AuthenticatorProcess {
    path: PathBuf,
    timeout: Option<Duration>,
}

impl AuthenticatorProcess {
    /// Creates a runner for the executable at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: None,
        }
    }

    /// Kills runs that do not finish within `limit`.
    #[must_use]
    pub const fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    /// Path of the executable.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs the authenticator once for `credential`.
    ///
    /// Returns `Ok(true)` when it exits with status zero and `Ok(false)` for any other exit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpawnError`] if the process cannot be started, fed or reaped, and
    /// [`Error::Timeout`] if a configured timeout elapses.
    pub async fn verify(&self, credential: &Credential) -> Result<bool> {
        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| self.spawn_error(format!("failed to execute: {err}")))?;

        self.feed(&mut child, credential).await?;

        let status = self.wait(&mut child).await?;
        if !status.success() {
            debug!(
                username = credential.username(),
                %status,
                "authenticator rejected credentials"
            );
        }
        Ok(status.success())
    }

    async fn feed(&self, child: &mut Child, credential: &Credential) -> Result<()> {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.spawn_error("stdin was not captured".to_string()))?;

        stdin
            .write_all(credential.to_stdin_payload().expose_secret().as_bytes())
            .await
            .map_err(|err| self.spawn_error(format!("failed to write credentials: {err}")))?;
        stdin
            .flush()
            .await
            .map_err(|err| self.spawn_error(format!("failed to write credentials: {err}")))?;

        // Dropping the handle closes the pipe so the authenticator sees EOF.
        drop(stdin);
        Ok(())
    }

    async fn wait(&self, child: &mut Child) -> Result<ExitStatus> {
        let Some(limit) = self.timeout else {
            return child
                .wait()
                .await
                .map_err(|err| self.spawn_error(format!("failed to wait: {err}")));
        };

        let waited = timeout(limit, child.wait()).await;
        match waited {
            Ok(status) => status.map_err(|err| self.spawn_error(format!("failed to wait: {err}"))),
            Err(_) => {
                if let Err(err) = child.kill().await {
                    warn!(path = %self.path.display(), "failed to kill authenticator: {err}");
                }
                Err(Error::Timeout(format!(
                    "{} did not exit within {limit:?}",
                    self.path.display()
                )))
            }
        }
    }

    fn spawn_error(&self, message: String) -> Error {
        Error::SpawnError {
            command: self.path.display().to_string(),
            message,
        }
    }
}
