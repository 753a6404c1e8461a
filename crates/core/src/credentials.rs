//! Flat credential file.
//!
//! One `username: hash` record per user, which also makes the file a YAML
//! mapping. Records are only ever appended; nothing here rewrites or removes
//! a line.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use regex::Regex;

use crate::error::CoreError;

/// Word characters, dots and dashes; the first character is a word character
/// so a record never opens with a YAML indicator.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*$").expect("valid regex"));

/// Username → password hash.
pub type Credentials = BTreeMap<String, String>;

/// Append-only credential file.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record. A missing or empty file holds no users.
    pub fn load(&self) -> Result<Credentials, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Credentials::new()),
            Err(e) => return Err(e.into()),
        };
        parse_credentials(&raw)
    }

    /// Stored hash for `username`, if the user exists.
    pub fn hash_for(&self, username: &str) -> Result<Option<String>, CoreError> {
        Ok(self.load()?.remove(username))
    }

    /// Check a signup request against the current records.
    ///
    /// Checks run in order: username shape, username uniqueness, password.
    pub fn validate_signup(&self, username: &str, password: &str) -> Result<(), CoreError> {
        self.check_new_username(username)?;
        if password.trim().is_empty() {
            return Err(CoreError::InvalidPassword);
        }
        Ok(())
    }

    /// Append a `username: hash` record, creating the file if needed.
    ///
    /// The username is re-checked under the write lock, so of two racing
    /// appends for the same name only the first lands.
    pub fn append(&self, username: &str, hash: &str) -> Result<(), CoreError> {
        let _guard = self.lock();
        self.check_new_username(username)?;

        let record = Credentials::from([(username.to_string(), hash.to_string())]);
        let line =
            serde_yaml::to_string(&record).map_err(|e| CoreError::Credentials(e.to_string()))?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        tracing::info!(username, "Credential record appended");
        Ok(())
    }

    fn check_new_username(&self, username: &str) -> Result<(), CoreError> {
        if !is_valid_username(username) {
            return Err(CoreError::InvalidUsername);
        }
        if self.load()?.contains_key(username) {
            return Err(CoreError::DuplicateUsername);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Letters, digits, `_`, `.` and `-`, starting with a letter, digit or `_`.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Parse credential file contents.
pub fn parse_credentials(raw: &str) -> Result<Credentials, CoreError> {
    if raw.trim().is_empty() {
        return Ok(Credentials::new());
    }
    let parsed: Option<Credentials> =
        serde_yaml::from_str(raw).map_err(|e| CoreError::Credentials(e.to_string()))?;
    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const ADMIN_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g";

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = CredentialStore::new(dir.path().join("users.yml"));
        (dir, store)
    }

    #[test]
    fn missing_file_has_no_users() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.hash_for("admin").unwrap(), None);
    }

    #[test]
    fn parses_one_record_per_line() {
        let raw = format!("admin: {ADMIN_HASH}\nbob: other\n");
        let creds = parse_credentials(&raw).unwrap();
        assert_eq!(creds.len(), 2);
        assert_eq!(creds["admin"], ADMIN_HASH);
        assert_eq!(creds["bob"], "other");
    }

    #[test]
    fn garbage_is_a_credentials_error() {
        assert_matches!(
            parse_credentials("- just\n- a list\n"),
            Err(CoreError::Credentials(_))
        );
    }

    #[test]
    fn append_then_lookup() {
        let (_dir, store) = store();
        store.append("admin", ADMIN_HASH).unwrap();
        store.append("alice", "hash-two").unwrap();

        assert_eq!(store.hash_for("admin").unwrap().as_deref(), Some(ADMIN_HASH));
        assert_eq!(store.hash_for("alice").unwrap().as_deref(), Some("hash-two"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("admin: "));
        assert!(lines[1].starts_with("alice: "));
    }

    #[test]
    fn signup_rejects_blank_or_spaced_usernames() {
        let (_dir, store) = store();
        assert_matches!(store.validate_signup("", "pw"), Err(CoreError::InvalidUsername));
        assert_matches!(store.validate_signup("   ", "pw"), Err(CoreError::InvalidUsername));
        assert_matches!(
            store.validate_signup("two words", "pw"),
            Err(CoreError::InvalidUsername)
        );
    }

    #[test]
    fn signup_rejects_duplicates_before_password() {
        let (_dir, store) = store();
        store.append("admin", ADMIN_HASH).unwrap();
        assert_matches!(
            store.validate_signup("admin", ""),
            Err(CoreError::DuplicateUsername)
        );
    }

    #[test]
    fn signup_rejects_blank_password() {
        let (_dir, store) = store();
        assert_matches!(
            store.validate_signup("newbie", "  "),
            Err(CoreError::InvalidPassword)
        );
        assert!(store.validate_signup("newbie", "hunter2").is_ok());
    }

    #[test]
    fn signup_rejects_yaml_indicator_usernames() {
        let (_dir, store) = store();
        store.append("admin", ADMIN_HASH).unwrap();

        for name in [
            "[evil", "*x", "'q", "{o", "!tag", "|", "%x", "@x", "#bob", "&a", "a:b", "-x",
            ".hidden", "bob#1",
        ] {
            assert_matches!(
                store.validate_signup(name, "pw"),
                Err(CoreError::InvalidUsername),
                "username {name:?}"
            );
            assert_matches!(
                store.append(name, "hash"),
                Err(CoreError::InvalidUsername),
                "username {name:?}"
            );
        }

        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(store.hash_for("admin").unwrap().as_deref(), Some(ADMIN_HASH));
    }

    #[test]
    fn accepted_usernames_round_trip() {
        let (_dir, store) = store();
        store.append("admin", ADMIN_HASH).unwrap();

        for name in ["bob", "jane.doe", "x-ray_2", "_service", "1990"] {
            store.validate_signup(name, "pw").unwrap();
            store.append(name, &format!("hash-{name}")).unwrap();
        }

        let creds = store.load().unwrap();
        assert_eq!(creds.len(), 6);
        assert_eq!(creds["jane.doe"], "hash-jane.doe");
        assert_eq!(creds["1990"], "hash-1990");
        assert_eq!(creds["admin"], ADMIN_HASH);
    }

    #[test]
    fn append_rejects_duplicate_username() {
        let (_dir, store) = store();
        store.append("bob", "first").unwrap();

        assert_matches!(store.append("bob", "second"), Err(CoreError::DuplicateUsername));
        assert_eq!(store.hash_for("bob").unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn concurrent_appends_keep_the_first_record() {
        let (_dir, store) = store();

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = &store;
                    scope.spawn(move || store.append("racer", &format!("hash-{i}")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, CoreError::DuplicateUsername)));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), 1);
    }
}
