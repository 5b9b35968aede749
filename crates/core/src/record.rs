//! The contract every domain record kind implements so that one generic
//! store, view and controller can serve all of them.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, FieldError};
use crate::status::Status;
use crate::types::{Date, EntityKind, RecordId};

/// A domain entity owned by a [`RecordStore`](crate::store::RecordStore).
///
/// The controller never inspects domain attributes directly; it only reads
/// the status, the optional date, and the text fields named in the list
/// configuration.
pub trait Record:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Status/category enumeration driving filter tabs and counts.
    type Status: Status;

    /// Mutable staging shape used by the form (no id).
    type Draft: Draft;

    /// Partial update; fields left as `None` are preserved.
    type Patch: fmt::Debug;

    const KIND: EntityKind;

    fn id(&self) -> RecordId;

    /// Overwrite the id. Only the store calls this.
    fn set_id(&mut self, id: RecordId);

    fn status(&self) -> Self::Status;

    /// Date used by the date-range filter, if the kind has one.
    fn date(&self) -> Option<Date> {
        None
    }

    /// Value of a searchable text field, `None` for unknown names.
    fn text_field(&self, field: &str) -> Option<&str>;

    /// Build a stored record from a draft and a freshly assigned id.
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    /// Copy the editable fields into a draft for an edit form.
    fn to_draft(&self) -> Self::Draft;

    /// Merge an edit-form draft into this record. The id never changes.
    fn merge_draft(&mut self, draft: Self::Draft);

    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Form staging record: string-addressable fields as bound to inputs.
pub trait Draft: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Empty draft with every field at its zero value and the status at the
    /// domain's initial value.
    fn empty() -> Self;

    /// Parse and set one field. Unknown names and unparsable values are
    /// rejected and leave the draft untouched.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError>;

    /// Whether the named field currently holds no value.
    fn is_blank(&self, field: &str) -> bool;

    /// Domain checks that run after the required-field check passes.
    fn check(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

/// Reject a field name a draft does not know.
pub fn unknown_field(entity: &str, field: &str) -> CoreError {
    CoreError::Validation(format!("Unknown {entity} field '{field}'"))
}

/// Parse an optional date input. Blank clears the value.
pub fn parse_optional_date(field: &str, value: &str) -> Result<Option<Date>, CoreError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    crate::types::parse_date(value)
        .map(Some)
        .ok_or_else(|| CoreError::Validation(format!("{field} must be a date (YYYY-MM-DD)")))
}

/// Parse a boolean checkbox value.
pub fn parse_bool(field: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" | "" => Ok(false),
        other => Err(CoreError::Validation(format!(
            "{field} must be true or false, got '{other}'"
        ))),
    }
}
