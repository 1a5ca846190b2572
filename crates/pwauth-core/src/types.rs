//! Credentials, user records and listing results exchanged with the host.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

/// A username/password pair that lives for the duration of one verification.
#[derive(Debug)]
pub struct Credential {
    username: String,
    password: SecretString,
}

impl Credential {
    /// Creates a new credential.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the plain-text password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Renders the authenticator stdin payload: username and password, one per line.
    #[must_use]
    pub fn to_stdin_payload(&self) -> SecretString {
        SecretString::from(format!("{}\n{}\n", self.username, self.password()))
    }
}

/// User information returned to the host.
///
/// `name` is never empty: it falls back to the login when no display name is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    name: String,
    mail: Option<String>,
    #[serde(rename = "grps")]
    groups: Vec<String>,
}

impl UserInfo {
    /// Builds a record for `login`, using `display_name` when it is present and non-empty.
    #[must_use]
    pub fn new<I>(login: &str, display_name: Option<&str>, groups: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let name = match display_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => login.to_string(),
        };

        Self {
            name,
            mail: None,
            groups: groups.into_iter().collect(),
        }
    }

    /// Sets the mail address.
    #[must_use]
    pub fn with_mail(mut self, mail: impl Into<String>) -> Self {
        self.mail = Some(mail.into());
        self
    }

    /// Full name of the user.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mail address, if the backend knows one.
    #[must_use]
    pub fn mail(&self) -> Option<&str> {
        self.mail.as_deref()
    }

    /// Group names in the order the system reported them.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Returns true if the user belongs to the provided group.
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// Ordered login → [`UserInfo`] mapping produced by bulk retrieval.
///
/// Iteration order is insertion order, which for file-backed listings is file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievedUsers {
    entries: Vec<(String, UserInfo)>,
}

impl RetrievedUsers {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. A login already present is replaced in place.
    pub fn insert(&mut self, login: impl Into<String>, info: UserInfo) {
        let login = login.into();
        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == login) {
            slot.1 = info;
        } else {
            self.entries.push((login, info));
        }
    }

    /// Looks up a user by login.
    #[must_use]
    pub fn get(&self, login: &str) -> Option<&UserInfo> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == login)
            .map(|(_, info)| info)
    }

    /// Number of users returned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was returned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logins in order.
    pub fn logins(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(login, _)| login.as_str())
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserInfo)> {
        self.entries.iter().map(|(login, info)| (login.as_str(), info))
    }
}

impl IntoIterator for RetrievedUsers {
    type Item = (String, UserInfo);
    type IntoIter = std::vec::IntoIter<(String, UserInfo)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for RetrievedUsers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(login, info)| (login, info)))
    }
}
