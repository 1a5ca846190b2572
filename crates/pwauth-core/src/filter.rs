//! Field/pattern filters applied to bulk user listings.

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::{types::UserInfo, Error, Result};

/// User attribute a filter pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    /// The login name.
    User,
    /// The full name.
    Name,
    /// The mail address. An absent address matches as the empty string.
    Mail,
    /// Group memberships. Matches when any group matches.
    Groups,
}

impl FilterField {
    /// Host-side key for this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Name => "name",
            Self::Mail => "mail",
            Self::Groups => "grps",
        }
    }
}

impl FromStr for FilterField {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self> {
        match key {
            "user" => Ok(Self::User),
            "name" => Ok(Self::Name),
            "mail" => Ok(Self::Mail),
            "grps" => Ok(Self::Groups),
            other => Err(Error::InvalidRequest(format!(
                "unknown filter field `{other}`"
            ))),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of case-insensitive field patterns.
///
/// A candidate passes only if every pattern matches; evaluation stops at the first miss.
/// An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    rules: Vec<(FilterField, Regex)>,
}

impl UserFilter {
    /// A filter that accepts every user.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter from `(field, pattern)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for an unknown field name or a pattern that does not
    /// compile.
    pub fn new<I, K, P>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: AsRef<str>,
    {
        entries
            .into_iter()
            .try_fold(Self::default(), |filter, (key, pattern)| {
                filter.with_rule(key.as_ref().parse()?, pattern.as_ref())
            })
    }

    /// Appends a rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the pattern does not compile.
    pub fn with_rule(mut self, field: FilterField, pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        self.rules.push((field, regex));
        Ok(self)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the filter has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns true if `login` / `info` satisfy every rule.
    #[must_use]
    pub fn matches(&self, login: &str, info: &UserInfo) -> bool {
        self.rules.iter().all(|(field, regex)| match field {
            FilterField::User => regex.is_match(login),
            FilterField::Name => regex.is_match(info.name()),
            FilterField::Mail => regex.is_match(info.mail().unwrap_or_default()),
            FilterField::Groups => info.groups().iter().any(|group| regex.is_match(group)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserInfo {
        UserInfo::new(
            "alice",
            Some("Alice Liddell"),
            vec!["dev".to_string(), "ops".to_string()],
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(UserFilter::all().matches("alice", &alice()));
        assert!(UserFilter::all().is_empty());
    }

    #[test]
    fn user_pattern_is_case_insensitive() {
        let filter = UserFilter::new([("user", "^a")]).unwrap();
        assert!(filter.matches("alice", &alice()));
        assert!(filter.matches("Adam", &UserInfo::new("Adam", None, Vec::new())));
        assert!(!filter.matches("bob", &UserInfo::new("bob", None, Vec::new())));
    }

    #[test]
    fn groups_pattern_matches_any_group() {
        let filter = UserFilter::new([("grps", "^OPS$")]).unwrap();
        assert!(filter.matches("alice", &alice()));

        let filter = UserFilter::new([("grps", "wheel")]).unwrap();
        assert!(!filter.matches("alice", &alice()));
    }

    #[test]
    fn groups_pattern_never_matches_empty_list() {
        let filter = UserFilter::new([("grps", ".*")]).unwrap();
        assert!(!filter.matches("carol", &UserInfo::new("carol", None, Vec::new())));
    }

    #[test]
    fn name_and_mail_patterns() {
        let filter = UserFilter::new([("name", "liddell")]).unwrap();
        assert!(filter.matches("alice", &alice()));

        let filter = UserFilter::new([("mail", "^$")]).unwrap();
        assert!(filter.matches("alice", &alice()));

        let filter = UserFilter::new([("mail", "@")]).unwrap();
        assert!(!filter.matches("alice", &alice()));
    }

    #[test]
    fn every_rule_must_match() {
        let filter = UserFilter::new([("user", "^a"), ("grps", "wheel")]).unwrap();
        assert_eq!(filter.len(), 2);
        assert!(!filter.matches("alice", &alice()));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = UserFilter::new([("shell", "bash")]).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = UserFilter::new([("user", "(")]).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn field_round_trips_through_key() {
        for field in [
            FilterField::User,
            FilterField::Name,
            FilterField::Mail,
            FilterField::Groups,
        ] {
            assert_eq!(field.as_str().parse::<FilterField>().unwrap(), field);
        }
    }
}
