//! Capability flags an adapter reports to its host.

use serde::{Deserialize, Serialize};

/// Individual operations a host may ask an adapter about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Create new accounts.
    AddUser,
    /// Delete accounts.
    DelUser,
    /// Change login names.
    ModLogin,
    /// Change passwords.
    ModPass,
    /// Change display names.
    ModName,
    /// Change mail addresses.
    ModMail,
    /// Change group memberships.
    ModGroups,
    /// Bulk user retrieval.
    GetUsers,
    /// Bulk user counting.
    GetUserCount,
    /// Enumerate all groups.
    GetGroups,
    /// Authentication happens outside the host's login form.
    External,
    /// Explicit logout hook.
    Logout,
}

/// Fixed set of boolean capability flags.
///
/// Defaults to a backend that supports nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// See [`Capability::AddUser`].
    pub add_user: bool,
    /// See [`Capability::DelUser`].
    pub del_user: bool,
    /// See [`Capability::ModLogin`].
    pub mod_login: bool,
    /// See [`Capability::ModPass`].
    pub mod_pass: bool,
    /// See [`Capability::ModName`].
    pub mod_name: bool,
    /// See [`Capability::ModMail`].
    pub mod_mail: bool,
    /// See [`Capability::ModGroups`].
    pub mod_groups: bool,
    /// See [`Capability::GetUsers`].
    pub get_users: bool,
    /// See [`Capability::GetUserCount`].
    pub get_user_count: bool,
    /// See [`Capability::GetGroups`].
    pub get_groups: bool,
    /// See [`Capability::External`].
    pub external: bool,
    /// See [`Capability::Logout`].
    pub logout: bool,
}

impl Capabilities {
    /// Capabilities of a read-only backend: no account mutation, logout supported.
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            add_user: false,
            del_user: false,
            mod_login: false,
            mod_pass: false,
            mod_name: false,
            mod_mail: false,
            mod_groups: false,
            get_users: false,
            get_user_count: false,
            get_groups: false,
            external: false,
            logout: true,
        }
    }

    /// Enables or disables bulk listing (`get_users` and `get_user_count` together).
    #[must_use]
    pub const fn with_listing(mut self, enabled: bool) -> Self {
        self.get_users = enabled;
        self.get_user_count = enabled;
        self
    }

    /// Returns whether the given capability is supported.
    #[must_use]
    pub const fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::AddUser => self.add_user,
            Capability::DelUser => self.del_user,
            Capability::ModLogin => self.mod_login,
            Capability::ModPass => self.mod_pass,
            Capability::ModName => self.mod_name,
            Capability::ModMail => self.mod_mail,
            Capability::ModGroups => self.mod_groups,
            Capability::GetUsers => self.get_users,
            Capability::GetUserCount => self.get_user_count,
            Capability::GetGroups => self.get_groups,
            Capability::External => self.external,
            Capability::Logout => self.logout,
        }
    }
}
