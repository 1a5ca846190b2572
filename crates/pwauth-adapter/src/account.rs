//! POSIX account records, from the OS database or a flat account file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use pwauth_core::error::Error as CoreError;

/// Shells of accounts that never log in interactively.
pub const NON_INTERACTIVE_SHELLS: [&str; 3] = ["/bin/false", "/usr/sbin/nologin", "/bin/sync"];

const FIELD_COUNT: usize = 7;

/// Errors that can occur when parsing an account file line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountRecordError {
    /// The line was empty.
    #[error("account line cannot be empty")]
    Empty,
    /// The line did not have exactly seven fields.
    #[error("account line has {0} fields, expected 7")]
    FieldCount(usize),
    /// The username field was empty.
    #[error("account line has an empty username")]
    MissingUsername,
    /// A numeric id field did not parse.
    #[error("account `{username}` has invalid {field}: `{value}`")]
    InvalidId {
        /// Login of the offending record.
        username: String,
        /// Field name (`uid` or `gid`).
        field: &'static str,
        /// Raw value.
        value: String,
    },
}

impl From<AccountRecordError> for CoreError {
    fn from(err: AccountRecordError) -> Self {
        CoreError::ParseError(err.to_string())
    }
}

/// A single account entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    username: String,
    uid: u32,
    gid: u32,
    gecos: String,
    home: PathBuf,
    shell: PathBuf,
}

impl AccountRecord {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        uid: u32,
        gid: u32,
        gecos: impl Into<String>,
        home: impl Into<PathBuf>,
        shell: impl Into<PathBuf>,
    ) -> Self {
        Self {
            username: username.into(),
            uid,
            gid,
            gecos: gecos.into(),
            home: home.into(),
            shell: shell.into(),
        }
    }

    /// Parses one `name:placeholder:uid:gid:gecos:home:shell` line.
    ///
    /// # Errors
    ///
    /// Returns [`AccountRecordError`] when the line is empty, does not have seven fields, or
    /// carries non-numeric ids.
    pub fn parse_line(line: &str) -> std::result::Result<Self, AccountRecordError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(AccountRecordError::Empty);
        }

        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != FIELD_COUNT {
            return Err(AccountRecordError::FieldCount(fields.len()));
        }

        let username = fields[0];
        if username.is_empty() {
            return Err(AccountRecordError::MissingUsername);
        }

        Ok(Self {
            username: username.to_string(),
            uid: parse_id(username, "uid", fields[2])?,
            gid: parse_id(username, "gid", fields[3])?,
            gecos: fields[4].to_string(),
            home: PathBuf::from(fields[5]),
            shell: PathBuf::from(fields[6]),
        })
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Numeric user id.
    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.uid
    }

    /// Primary group id.
    #[must_use]
    pub const fn gid(&self) -> u32 {
        self.gid
    }

    /// Raw comma-separated descriptive field.
    #[must_use]
    pub fn gecos(&self) -> &str {
        &self.gecos
    }

    /// Home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Login shell.
    #[must_use]
    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// Full name: the first comma-delimited gecos field, when non-empty.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.gecos
            .split(',')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Returns false for `root` and for accounts with a non-interactive shell.
    #[must_use]
    pub fn is_listable(&self) -> bool {
        self.username != "root"
            && !NON_INTERACTIVE_SHELLS
                .iter()
                .any(|shell| self.shell == Path::new(shell))
    }
}

impl From<nix::unistd::User> for AccountRecord {
    fn from(user: nix::unistd::User) -> Self {
        Self {
            gecos: user.gecos.to_string_lossy().into_owned(),
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
            username: user.name,
            home: user.dir,
            shell: user.shell,
        }
    }
}

impl FromStr for AccountRecord {
    type Err = AccountRecordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}

impl fmt::Display for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:x:{}:{}:{}:{}:{}",
            self.username,
            self.uid,
            self.gid,
            self.gecos,
            self.home.display(),
            self.shell.display()
        )
    }
}

fn parse_id(
    username: &str,
    field: &'static str,
    value: &str,
) -> std::result::Result<u32, AccountRecordError> {
    value.parse().map_err(|_| AccountRecordError::InvalidId {
        username: username.to_string(),
        field,
        value: value.to_string(),
    })
}
