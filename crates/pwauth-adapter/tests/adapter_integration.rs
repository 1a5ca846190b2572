//! Integration tests driving the adapter against real processes.
//!
//! The authenticator and group utility are small shell scripts written to a temporary
//! directory; account lookups go to the real OS database using the current user.

use pwauth_adapter::{AdapterConfig, PwauthAdapter};
use pwauth_core::{AuthBackend, Capability, Error, UserFilter};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn current_login() -> String {
    nix::unistd::User::from_uid(nix::unistd::Uid::current())
        .expect("account lookup")
        .expect("current uid has a passwd entry")
        .name
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Stub environment: an authenticator driven by a `(user, pass) -> exit code` table and a
/// `groups` replacement with fixed output.
struct Stubs {
    dir: TempDir,
}

impl Stubs {
    fn new(table: &[(&str, &str, i32)]) -> Self {
        let dir = TempDir::new().unwrap();

        let mut body = format!(
            "echo run >> '{}'\nread user\nread pass\n",
            dir.path().join("spawned").display()
        );
        for (user, pass, code) in table {
            body.push_str(&format!(
                "[ \"$user\" = '{user}' ] && [ \"$pass\" = '{pass}' ] && exit {code}\n"
            ));
        }
        body.push_str("exit 1");
        write_script(&dir.path().join("pwauth"), &body);

        write_script(
            &dir.path().join("groups"),
            "[ \"$1\" = -- ] || exit 2\necho \"$2 : staff  wiki\"",
        );

        Self { dir }
    }

    fn config(&self) -> AdapterConfig {
        AdapterConfig::new(self.dir.path().join("pwauth"))
            .unwrap()
            .with_groups_command(self.dir.path().join("groups").display().to_string())
    }

    fn runs(&self) -> usize {
        fs::read_to_string(self.dir.path().join("spawned"))
            .map(|log| log.lines().count())
            .unwrap_or(0)
    }
}

#[tokio::test]
async fn check_pass_follows_authenticator_table() {
    let me = current_login();
    let stubs = Stubs::new(&[(me.as_str(), "correct horse", 0), (me.as_str(), "locked", 7)]);
    let adapter = PwauthAdapter::new(stubs.config()).unwrap();

    assert!(adapter.check_pass(&me, "correct horse").await);
    assert!(!adapter.check_pass(&me, "locked").await);
    assert!(!adapter.check_pass(&me, "battery staple").await);
    assert_eq!(stubs.runs(), 3);
}

#[tokio::test]
async fn unknown_users_do_not_reach_the_authenticator() {
    let stubs = Stubs::new(&[("pwauth-bridge-ghost", "secret", 0)]);
    let adapter = PwauthAdapter::new(stubs.config()).unwrap();

    for user in ["pwauth-bridge-ghost", "pwauth-bridge-nobody", ""] {
        assert!(!adapter.check_pass(user, "secret").await);
    }
    assert_eq!(stubs.runs(), 0);
}

#[tokio::test]
async fn authenticator_that_ignores_stdin_still_returns() {
    let me = current_login();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pwauth");
    write_script(&path, "exit 0");

    // The write may or may not race the exit; either way the call must simply return.
    let adapter = PwauthAdapter::new(AdapterConfig::new(&path).unwrap()).unwrap();
    let _ = adapter.check_pass(&me, "whatever").await;
}

#[test]
fn non_executable_authenticator_disables_the_adapter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pwauth");
    fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let result = PwauthAdapter::new(AdapterConfig::new(&path).unwrap());
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn user_data_for_current_user() {
    let me = current_login();
    let stubs = Stubs::new(&[]);
    let adapter = PwauthAdapter::new(stubs.config()).unwrap();

    let info = adapter.user_data(&me).await.unwrap();
    assert!(!info.name().is_empty());
    assert_eq!(info.mail(), None);
    assert_eq!(info.groups(), ["staff", "wiki"]);
}

#[tokio::test]
async fn user_data_for_unknown_user_fails() {
    let stubs = Stubs::new(&[]);
    let adapter = PwauthAdapter::new(stubs.config()).unwrap();

    assert!(matches!(
        adapter.user_data("pwauth-bridge-ghost").await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        adapter.user_groups("pwauth-bridge-ghost").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn listing_from_fixture_file() {
    let stubs = Stubs::new(&[]);
    let adapter =
        PwauthAdapter::new(stubs.config().with_account_file(fixtures_dir().join("passwd")))
            .unwrap();

    let caps = adapter.capabilities();
    assert!(caps.supports(Capability::GetUsers));
    assert!(caps.supports(Capability::GetUserCount));
    assert!(!caps.supports(Capability::AddUser));

    let all = adapter
        .retrieve_users(0, 0, &UserFilter::all())
        .await
        .unwrap();
    assert_eq!(all.len(), 10);
    assert!(all.get("root").is_none());
    assert!(all.get("daemon").is_none());
    assert!(all.get("backup").is_none());
    assert_eq!(all.get("alice").unwrap().name(), "Alice Liddell");
    assert_eq!(all.get("bob").unwrap().name(), "bob");

    let page = adapter
        .retrieve_users(3, 4, &UserFilter::all())
        .await
        .unwrap();
    assert_eq!(
        page.logins().collect::<Vec<_>>(),
        ["carol", "dave", "erin", "frank"]
    );
}

#[tokio::test]
async fn fixture_filters_and_counts_agree() {
    let stubs = Stubs::new(&[]);
    let adapter =
        PwauthAdapter::new(stubs.config().with_account_file(fixtures_dir().join("passwd")))
            .unwrap();

    let by_login = UserFilter::new([("user", "^a")]).unwrap();
    let listed = adapter.retrieve_users(0, 0, &by_login).await.unwrap();
    assert_eq!(listed.logins().collect::<Vec<_>>(), ["alice", "Adam"]);

    for filter in [
        UserFilter::all(),
        by_login,
        UserFilter::new([("name", "^[a-d]")]).unwrap(),
        UserFilter::new([("user", "e"), ("name", "n")]).unwrap(),
        UserFilter::new([("mail", ".")]).unwrap(),
    ] {
        let listed = adapter.retrieve_users(0, 0, &filter).await.unwrap();
        assert_eq!(adapter.user_count(&filter).await, listed.len());
    }
}

#[tokio::test]
async fn negative_window_is_rejected() {
    let stubs = Stubs::new(&[]);
    let adapter =
        PwauthAdapter::new(stubs.config().with_account_file(fixtures_dir().join("passwd")))
            .unwrap();

    assert!(adapter
        .retrieve_users(-1, 0, &UserFilter::all())
        .await
        .is_err());
    assert!(adapter
        .retrieve_users(0, -1, &UserFilter::all())
        .await
        .is_err());
}

#[tokio::test]
async fn logout_is_a_no_op() {
    let stubs = Stubs::new(&[]);
    let adapter = PwauthAdapter::new(stubs.config()).unwrap();
    assert!(adapter.capabilities().supports(Capability::Logout));
    adapter.logout().await;
}
