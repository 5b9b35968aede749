//! Process-wide authentication flag, injected into the shell.
//!
//! The flag is the only state that survives a restart besides the record
//! snapshots. It is read once by [`Session::init`] and written on
//! login/logout through a [`SessionStore`].

use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{ShellError, ShellResult};

/// Where the authentication flag lives.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> ShellResult<bool>;
    fn save(&self, authenticated: bool) -> ShellResult<()>;
}

/// Flag file: present with `true` means signed in, absent means signed out.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> ShellError {
        ShellError::Session {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ShellResult<bool> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.trim() == "true"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, authenticated: bool) -> ShellResult<()> {
        if authenticated {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
            std::fs::write(&self.path, "true").map_err(|e| self.io_error(e))
        } else {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(e)),
            }
        }
    }
}

/// In-memory flag for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    flag: Mutex<bool>,
}

impl MemorySessionStore {
    pub fn new(authenticated: bool) -> Self {
        Self {
            flag: Mutex::new(authenticated),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ShellResult<bool> {
        Ok(*self.flag.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, authenticated: bool) -> ShellResult<()> {
        *self.flag.lock().unwrap_or_else(|e| e.into_inner()) = authenticated;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

pub struct Session {
    store: Box<dyn SessionStore>,
    authenticated: bool,
}

impl Session {
    /// Read the persisted flag.
    pub fn init(store: Box<dyn SessionStore>) -> ShellResult<Self> {
        let authenticated = store.load()?;
        tracing::info!(authenticated, "Session initialised");
        Ok(Self {
            store,
            authenticated,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Accept any non-empty email and password. Returns whether the login
    /// succeeded; only a storage failure is an error.
    pub fn login(&mut self, credentials: &Credentials) -> ShellResult<bool> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            tracing::info!("Login rejected: missing email or password");
            return Ok(false);
        }
        self.store.save(true)?;
        self.authenticated = true;
        tracing::info!(email = %credentials.email, "Logged in");
        Ok(true)
    }

    pub fn logout(&mut self) -> ShellResult<()> {
        self.teardown()
    }

    /// Clear the persisted flag.
    pub fn teardown(&mut self) -> ShellResult<()> {
        self.store.save(false)?;
        self.authenticated = false;
        tracing::info!("Session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- file store ---------------------------------------------------------

    #[test]
    fn file_flag_survives_reinit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.flag");

        let mut session = Session::init(Box::new(FileSessionStore::new(&path))).unwrap();
        assert!(!session.is_authenticated());
        assert!(session
            .login(&Credentials::new("tarun@gmail.com", "secret"))
            .unwrap());

        let session = Session::init(Box::new(FileSessionStore::new(&path))).unwrap();
        assert!(session.is_authenticated());
    }

    #[test]
    fn logout_removes_flag_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.flag");
        let mut session = Session::init(Box::new(FileSessionStore::new(&path))).unwrap();
        session.login(&Credentials::new("a@b.c", "x")).unwrap();
        assert!(path.exists());
        session.logout().unwrap();
        assert!(!path.exists());
        session.logout().unwrap();
    }

    #[test]
    fn unexpected_flag_contents_mean_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.flag");
        std::fs::write(&path, "yes please").unwrap();
        assert!(!FileSessionStore::new(&path).load().unwrap());
    }

    // -- login rules --------------------------------------------------------

    #[test]
    fn blank_credentials_are_rejected() {
        let mut session = Session::init(Box::new(MemorySessionStore::default())).unwrap();
        assert!(!session.login(&Credentials::new("", "pw")).unwrap());
        assert!(!session.login(&Credentials::new("a@b.c", "")).unwrap());
        assert!(!session.is_authenticated());
    }
}
