//! Courtdesk dashboard shell.
//!
//! Wires the domain core to its collaborators: environment configuration,
//! the persisted session flag, route resolution, per-page controllers and
//! the background snapshot writer.

pub mod app;
pub mod config;
pub mod error;
pub mod navigation;
pub mod session;
pub mod state;

pub use app::{run, BootReport};
pub use config::{LogFormat, ShellConfig};
pub use error::{ShellError, ShellResult};
pub use navigation::Route;
pub use session::{Credentials, FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use state::AppState;
