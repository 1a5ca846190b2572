//! The pwauth-backed authentication adapter.

use crate::{
    account::AccountRecord,
    authenticator::AuthenticatorProcess,
    config::AdapterConfig,
    directory::{OsDirectory, SystemDirectory},
    groups::parse_group_listing,
    listing::{AccountFile, Page},
};
use async_trait::async_trait;
use nix::unistd::{access, AccessFlags};
use pwauth_core::{
    AuthBackend, Capabilities, Credential, Error, Result, RetrievedUsers, UserFilter, UserInfo,
};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, warn};

/// Authentication adapter that checks passwords with an external authenticator and
/// answers directory queries from the OS account database.
///
/// The adapter is read-only: it reports no account-mutation capabilities, and bulk
/// listing only when a readable account file was configured.
pub struct PwauthAdapter {
    authenticator: AuthenticatorProcess,
    account_file: Option<AccountFile>,
    capabilities: Capabilities,
    directory: Box<dyn SystemDirectory>,
}

impl PwauthAdapter {
    /// Creates an adapter backed by the local account database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid or the authenticator
    /// is not an executable file. The adapter must not be used in that case.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let directory = Box::new(OsDirectory::new(config.groups_command.clone()));
        Self::assemble(config, directory)
    }

    #[cfg(test)]
    pub(crate) fn with_directory(
        config: AdapterConfig,
        directory: Box<dyn SystemDirectory>,
    ) -> Result<Self> {
        Self::assemble(config, directory)
    }

    fn assemble(config: AdapterConfig, directory: Box<dyn SystemDirectory>) -> Result<Self> {
        let config = config.validated()?;
        ensure_executable(&config.authenticator_path).map_err(|err| {
            error!("{err}");
            err
        })?;

        let listing = config.account_file().is_some_and(is_readable);
        if let Some(path) = config.account_file().filter(|_| !listing) {
            warn!(path = %path.display(), "account file is not readable, bulk listing disabled");
        }

        let capabilities = Capabilities::read_only().with_listing(listing);
        debug!(
            authenticator = %config.authenticator_path.display(),
            listing,
            "pwauth adapter ready"
        );

        Ok(Self {
            authenticator: AuthenticatorProcess::new(&config.authenticator_path)
                .with_timeout(config.authenticator_timeout()),
            account_file: config.account_file().map(AccountFile::new),
            capabilities,
            directory,
        })
    }

    /// Verifies a credential.
    ///
    /// Unknown accounts are rejected without starting the authenticator.
    ///
    /// # Errors
    ///
    /// Propagates account lookup failures and authenticator spawn errors or timeouts.
    pub async fn verify(&self, credential: &Credential) -> Result<bool> {
        if self.directory.account(credential.username())?.is_none() {
            debug!(username = credential.username(), "unknown user");
            return Ok(false);
        }
        self.authenticator.verify(credential).await
    }

    /// Groups `username` belongs to, in the order the system reports them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown accounts, and a spawn, command or parse error
    /// when the group utility fails or prints something unexpected.
    pub async fn user_groups(&self, username: &str) -> Result<Vec<String>> {
        self.require_account(username)?;
        self.group_names(username).await
    }

    fn require_account(&self, username: &str) -> Result<AccountRecord> {
        self.directory
            .account(username)?
            .ok_or_else(|| Error::NotFound(format!("user `{username}` does not exist")))
    }

    async fn group_names(&self, username: &str) -> Result<Vec<String>> {
        let output = self.directory.group_listing(username).await?;
        parse_group_listing(&output)
    }

    async fn listing_info(&self, record: &AccountRecord) -> UserInfo {
        let groups = self
            .user_groups(record.username())
            .await
            .unwrap_or_else(|err| {
                debug!(username = record.username(), "listing without groups: {err}");
                Vec::new()
            });
        UserInfo::new(record.username(), record.display_name(), groups)
    }

    /// Walks the account file in order, collecting the `page` window of matches.
    ///
    /// An absent or unreadable file yields no users. A login listed more than once keeps its
    /// first record only, so every match is a distinct user.
    async fn scan(&self, filter: &UserFilter, page: Page) -> RetrievedUsers {
        let mut users = RetrievedUsers::new();
        let Some(file) = &self.account_file else {
            debug!("no account file configured");
            return users;
        };

        let mut lines = match file.open().await {
            Ok(lines) => lines,
            Err(err) => {
                warn!(path = %file.path().display(), "cannot open account file: {err}");
                return users;
            }
        };

        let mut seen = HashSet::new();
        let mut matched = 0usize;
        loop {
            let record = match lines.next_listable().await {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(err) => {
                    warn!(path = %file.path().display(), "stopped reading account file: {err}");
                    break;
                }
            };

            if !seen.insert(record.username().to_owned()) {
                warn!(
                    path = %file.path().display(),
                    username = record.username(),
                    "ignoring duplicate account entry"
                );
                continue;
            }

            let info = self.listing_info(&record).await;
            if !filter.matches(record.username(), &info) {
                continue;
            }

            if matched >= page.start() {
                users.insert(record.username(), info);
                if page.is_full(users.len()) {
                    break;
                }
            }
            matched += 1;
        }

        users
    }
}

#[async_trait]
impl AuthBackend for PwauthAdapter {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn check_pass(&self, username: &str, password: &str) -> bool {
        let credential = Credential::new(username, password);
        match self.verify(&credential).await {
            Ok(accepted) => accepted,
            Err(err) if err.should_log() => {
                error!(user = username, "authentication failed: {err}");
                false
            }
            Err(err) => {
                warn!(user = username, "authentication failed: {err}");
                false
            }
        }
    }

    async fn user_data(&self, username: &str) -> Result<UserInfo> {
        let account = self.require_account(username)?;
        let groups = self.group_names(username).await?;
        Ok(UserInfo::new(username, account.display_name(), groups))
    }

    async fn user_count(&self, filter: &UserFilter) -> usize {
        self.scan(filter, Page::all()).await.len()
    }

    async fn retrieve_users(
        &self,
        start: i64,
        limit: i64,
        filter: &UserFilter,
    ) -> Result<RetrievedUsers> {
        let page = Page::new(start, limit)?;
        Ok(self.scan(filter, page).await)
    }
}

fn ensure_executable(path: &Path) -> Result<()> {
    if path.is_file() && access(path, AccessFlags::X_OK).is_ok() {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "authenticator {} is not executable",
            path.display()
        )))
    }
}

fn is_readable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::R_OK).is_ok()
}
