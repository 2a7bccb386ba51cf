//! Session credentials and the on-disk cookie cache.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::error::{Error, Result};

/// Authentication mode, fixed at client construction.
#[derive(Debug, Clone)]
pub enum Auth {
    /// Username/password login; the session cookie is obtained from the
    /// provider and cached on disk.
    Credentials {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// Externally supplied session cookie; no login is ever performed.
    Cookie(String),
}

/// Session state spanning provider calls.
///
/// Two states: unauthenticated (no cookie held) and authenticated (cookie
/// held, presumed valid until the provider answers 401). The cookie of a
/// credentials session is cached in one file per (username, password) pair
/// and overwritten whole on every successful login.
#[derive(Debug)]
pub(crate) struct Session {
    auth: Auth,
    cache_dir: PathBuf,
    cookie: Option<String>,
}

impl Session {
    pub(crate) fn new(auth: Auth, cache_dir: PathBuf) -> Self {
        let cookie = match &auth {
            Auth::Cookie(value) => Some(value.clone()),
            Auth::Credentials { .. } => None,
        };
        Self {
            auth,
            cache_dir,
            cookie,
        }
    }

    pub(crate) const fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The cookie currently held, if any.
    pub(crate) fn held(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Cache file path, deterministic per (username, password) pair.
    /// External-cookie sessions have no cache file.
    fn cache_path(&self) -> Option<PathBuf> {
        let Auth::Credentials { username, password } = &self.auth else {
            return None;
        };
        let digest = blake3::hash(format!("{username}|{password}").as_bytes());
        let Some(prefix) = digest.to_hex().get(..16).map(str::to_owned) else {
            return None;
        };
        Some(self.cache_dir.join(format!("{username}-{prefix}.cookie")))
    }

    /// Returns the held cookie, falling back to the on-disk cache.
    ///
    /// A cached cookie transitions the session to authenticated without
    /// contacting the server; validity is only discovered reactively via a
    /// 401 response.
    pub(crate) fn ensure_cached(&mut self) -> Result<Option<String>> {
        if let Some(cookie) = &self.cookie {
            return Ok(Some(cookie.clone()));
        }
        let Some(path) = self.cache_path() else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }
        let cookie = std::fs::read_to_string(&path).map_err(|source| Error::CookieCache {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "loaded session cookie from cache");
        self.cookie = Some(cookie.clone());
        Ok(Some(cookie))
    }

    /// Stores a freshly obtained cookie in memory and on disk.
    ///
    /// The cache file is overwritten whole, never appended.
    pub(crate) fn store(&mut self, cookie: String) -> Result<()> {
        if let Some(path) = self.cache_path() {
            std::fs::create_dir_all(&self.cache_dir).map_err(|source| Error::CookieCache {
                path: self.cache_dir.clone(),
                source,
            })?;
            std::fs::write(&path, &cookie).map_err(|source| Error::CookieCache {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "session cookie cached");
        }
        self.cookie = Some(cookie);
        Ok(())
    }

    /// Drops the held cookie and removes the cache file.
    ///
    /// Called after a 401; without the file removal the next call would
    /// reload the same rejected cookie from disk. Removal failures are
    /// logged, not raised, so they cannot mask the authentication error.
    pub(crate) fn invalidate(&mut self) {
        self.cookie = None;
        if let Some(path) = self.cache_path()
            && path.is_file()
            && let Err(error) = std::fs::remove_file(&path)
        {
            warn!(path = %path.display(), %error, "failed to remove cached session cookie");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn credentials(username: &str, password: &str) -> Auth {
        Auth::Credentials {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn test_external_cookie_is_held_immediately() {
        // Arrange & Act
        let mut session = Session::new(Auth::Cookie(String::from("sid=abc")), PathBuf::new());

        // Assert
        assert_eq!(session.held(), Some("sid=abc"));
        assert_eq!(session.ensure_cached().unwrap().as_deref(), Some("sid=abc"));
    }

    #[test]
    fn test_credentials_session_starts_unauthenticated() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let mut session = Session::new(credentials("alice", "secret"), dir.path().to_path_buf());

        // Assert
        assert!(session.held().is_none());
        assert!(session.ensure_cached().unwrap().is_none());
    }

    #[test]
    fn test_store_then_load_roundtrip() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(credentials("alice", "secret"), dir.path().to_path_buf());

        // Act
        session.store(String::from("sid=xyz")).unwrap();
        let mut fresh = Session::new(credentials("alice", "secret"), dir.path().to_path_buf());
        let loaded = fresh.ensure_cached().unwrap();

        // Assert
        assert_eq!(loaded.as_deref(), Some("sid=xyz"));
    }

    #[test]
    fn test_cache_file_differs_per_password() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let a = Session::new(credentials("alice", "secret"), dir.path().to_path_buf());
        let b = Session::new(credentials("alice", "other"), dir.path().to_path_buf());

        // Act & Assert
        assert_ne!(a.cache_path(), b.cache_path());
    }

    #[test]
    fn test_invalidate_removes_cache_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(credentials("alice", "secret"), dir.path().to_path_buf());
        session.store(String::from("sid=xyz")).unwrap();
        let path = session.cache_path().unwrap();
        assert!(path.is_file());

        // Act
        session.invalidate();

        // Assert
        assert!(session.held().is_none());
        assert!(!path.exists());
        let mut fresh = Session::new(credentials("alice", "secret"), dir.path().to_path_buf());
        assert!(fresh.ensure_cached().unwrap().is_none());
    }
}
