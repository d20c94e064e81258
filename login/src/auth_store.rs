use std::collections::BTreeMap;
use std::fs::File;
use std::fs::OpenOptions;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use saferoute_backend_client::CredentialStore;
use saferoute_backend_client::types::User;
use tracing::warn;

use crate::token_data::Session;

pub const ACCESS_TOKEN_KEY: &str = "sr_access";
pub const REFRESH_TOKEN_KEY: &str = "sr_refresh";
pub const USER_KEY: &str = "sr_user";

pub type StorageEntries = BTreeMap<String, String>;

pub fn get_storage_file(saferoute_home: &Path) -> PathBuf {
    saferoute_home.join("storage.json")
}

/// Read the flat string map kept in `storage.json`.
pub fn try_read_storage_json(storage_file: &Path) -> std::io::Result<StorageEntries> {
    let mut file = File::open(storage_file)?;
    let mut contents = String::new();
    use std::io::Read as _;
    file.read_to_string(&mut contents)?;
    let entries: StorageEntries = serde_json::from_str(&contents)?;
    Ok(entries)
}

pub(crate) fn write_storage_json(
    storage_file: &Path,
    entries: &StorageEntries,
) -> std::io::Result<()> {
    if let Some(parent) = storage_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json_data = serde_json::to_string_pretty(entries)?;
    let mut options = OpenOptions::new();
    options.truncate(true).write(true).create(true);
    #[cfg(unix)]
    {
        options.mode(0o600);
    }
    let mut file = options.open(storage_file)?;
    use std::io::Write as _;
    file.write_all(json_data.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Persistent key/value storage for the signed-in session.
///
/// Entries are cached in memory and written through to `storage.json` on
/// every change. In-memory values are updated before the write, so a failed
/// write never leaves the process using stale credentials.
#[derive(Debug)]
pub struct AuthStore {
    storage_file: PathBuf,
    entries: Mutex<StorageEntries>,
}

impl AuthStore {
    /// Load `storage.json` from `saferoute_home`. A missing file yields an
    /// empty store; an unreadable one is logged and treated as empty.
    pub fn load(saferoute_home: &Path) -> Self {
        let storage_file = get_storage_file(saferoute_home);
        let entries = match try_read_storage_json(&storage_file) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StorageEntries::new(),
            Err(err) => {
                warn!("ignoring unreadable {}: {err}", storage_file.display());
                StorageEntries::new()
            }
        };
        Self {
            storage_file,
            entries: Mutex::new(entries),
        }
    }

    pub fn storage_file(&self) -> &Path {
        &self.storage_file
    }

    fn lock(&self) -> std::io::Result<MutexGuard<'_, StorageEntries>> {
        self.entries
            .lock()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))
    }

    /// Apply `change` to the cached entries and persist the result in the
    /// same critical section.
    fn update(&self, change: impl FnOnce(&mut StorageEntries)) -> std::io::Result<()> {
        let mut guard = self.lock()?;
        change(&mut guard);
        write_storage_json(&self.storage_file, &guard)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().ok().and_then(|guard| guard.get(key).cloned())
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> std::io::Result<()> {
        let value = value.into();
        self.update(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    /// Store both credentials and the user record together.
    pub fn save_session(&self, session: &Session) -> std::io::Result<()> {
        let user = serde_json::to_string(&session.user)?;
        self.update(|entries| {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), session.access_token.clone());
            entries.insert(REFRESH_TOKEN_KEY.to_string(), session.refresh_token.clone());
            entries.insert(USER_KEY.to_string(), user);
        })
    }

    pub fn cache_user(&self, user: &User) -> std::io::Result<()> {
        let user = serde_json::to_string(user)?;
        self.set(USER_KEY, user)
    }

    /// Remove all three session entries at once.
    pub fn clear_session(&self) -> std::io::Result<()> {
        self.update(|entries| {
            entries.remove(ACCESS_TOKEN_KEY);
            entries.remove(REFRESH_TOKEN_KEY);
            entries.remove(USER_KEY);
        })
    }

    /// The user record cached at the last login or restore, if it still
    /// parses and names a user (non-empty id and email).
    pub fn cached_user(&self) -> Option<User> {
        let raw = self.get(USER_KEY)?;
        match serde_json::from_str::<User>(&raw) {
            Ok(user) if !user.id.is_empty() && !user.email.is_empty() => Some(user),
            Ok(_) => {
                warn!("ignoring cached user without id or email");
                None
            }
            Err(err) => {
                warn!("ignoring malformed cached user: {err}");
                None
            }
        }
    }

    /// The persisted session, when all three entries are present.
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            user: self.cached_user()?,
        })
    }
}

impl CredentialStore for AuthStore {
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn replace_access_token(&self, access_token: &str) -> std::io::Result<()> {
        self.set(ACCESS_TOKEN_KEY, access_token)
    }
}
