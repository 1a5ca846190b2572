//! The interface a host drives an authentication backend through.

use async_trait::async_trait;

use crate::{Capabilities, Result, RetrievedUsers, UserFilter, UserInfo};

/// Authentication and directory backend as seen by the host.
///
/// The host consults [`AuthBackend::capabilities`] before calling the listing operations;
/// calling an operation the backend reports as unsupported is a host bug.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Flags describing which operations this backend supports.
    fn capabilities(&self) -> Capabilities;

    /// Checks a username/password pair. Failures of any kind yield `false`.
    async fn check_pass(&self, username: &str, password: &str) -> bool;

    /// Returns user information for `username`.
    async fn user_data(&self, username: &str) -> Result<UserInfo>;

    /// Called when a user logs out.
    async fn logout(&self) {}

    /// Counts users matching `filter`.
    async fn user_count(&self, filter: &UserFilter) -> usize;

    /// Returns up to `limit` users matching `filter`, skipping the first `start` matches.
    /// A `limit` of zero means unlimited.
    async fn retrieve_users(
        &self,
        start: i64,
        limit: i64,
        filter: &UserFilter,
    ) -> Result<RetrievedUsers>;
}
