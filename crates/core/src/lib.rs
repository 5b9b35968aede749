//! Courtdesk domain core.
//!
//! Pure logic with no I/O. Every list page of the reporter dashboard is an
//! instance of one generic machine:
//!
//! - [`store::RecordStore`]: owned collection with store-assigned ids.
//! - [`view::DerivedView`]: filtered subset plus global status counts.
//! - [`form::FormMachine`]: closed / create / edit modal state.
//! - [`controller::RecordListController`]: the commands a page issues.
//!
//! Domain modules (`jobs`, `bills`, `files`, `notifications`, `holidays`,
//! `certifications`) plug their record types into that machine; `profile`,
//! `settings` and `dashboard` cover the single-object pages.

#[macro_use]
pub mod status;

pub mod bills;
pub mod certifications;
pub mod confirm;
pub mod controller;
pub mod criteria;
pub mod dashboard;
pub mod error;
pub mod files;
pub mod form;
pub mod holidays;
pub mod jobs;
pub mod money;
pub mod notifications;
pub mod pending;
pub mod profile;
pub mod record;
pub mod settings;
pub mod store;
pub mod types;
pub mod view;

pub use controller::{FormOutcome, RecordListController, RecordSink};
pub use error::{CoreError, FieldError};
pub use record::{Draft, Record};
pub use types::{Date, EntityKind, RecordId};
