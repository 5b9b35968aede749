//! Professional certifications listed on the profile page.

use serde::{Deserialize, Serialize};

use crate::controller::RecordListController;
use crate::error::CoreError;
use crate::record::{unknown_field, Draft, Record};
use crate::types::{EntityKind, RecordId};
use crate::view::ListConfig;

/// Issuer recorded for certificates the user uploads themselves.
pub const CUSTOM_UPLOAD_ISSUER: &str = "Custom Upload";

define_status_enum! {
    /// Where a certification entry came from.
    CertificationOrigin (initial = Uploaded) {
        Issued => "issued",
        Uploaded => "uploaded",
    }
}

pub const CERTIFICATION_LIST: ListConfig = ListConfig {
    searchable_fields: &["name", "issuer"],
    required_fields: &["name", "issuer", "file"],
};

pub type CertificationList = RecordListController<Certification>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: RecordId,
    pub name: String,
    pub issuer: String,
    pub year: i32,
    pub file: String,
    pub origin: CertificationOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCertification {
    pub name: String,
    pub issuer: String,
    pub year: i32,
    pub file: String,
    pub origin: CertificationOrigin,
}

impl CreateCertification {
    /// Entry for an uploaded certificate file: the name is the file name
    /// without its extension.
    pub fn from_upload(file_name: &str, year: i32) -> Self {
        let name = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        };
        Self {
            name: name.to_string(),
            issuer: CUSTOM_UPLOAD_ISSUER.to_string(),
            year,
            file: file_name.to_string(),
            origin: CertificationOrigin::Uploaded,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateCertification {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub year: Option<i32>,
}

impl Draft for CreateCertification {
    fn empty() -> Self {
        Self {
            name: String::new(),
            issuer: String::new(),
            year: 0,
            file: String::new(),
            origin: CertificationOrigin::Uploaded,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "name" => self.name = value.to_string(),
            "issuer" => self.issuer = value.to_string(),
            "year" => {
                self.year = value.trim().parse().map_err(|_| {
                    CoreError::Validation(format!("year must be a number, got '{value}'"))
                })?
            }
            "file" => self.file = value.to_string(),
            other => return Err(unknown_field("certification", other)),
        }
        Ok(())
    }

    fn is_blank(&self, field: &str) -> bool {
        match field {
            "name" => self.name.trim().is_empty(),
            "issuer" => self.issuer.trim().is_empty(),
            "file" => self.file.trim().is_empty(),
            "year" => self.year == 0,
            _ => false,
        }
    }
}

impl Record for Certification {
    type Status = CertificationOrigin;
    type Draft = CreateCertification;
    type Patch = UpdateCertification;

    const KIND: EntityKind = EntityKind::Certification;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn status(&self) -> CertificationOrigin {
        self.origin
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "issuer" => Some(&self.issuer),
            "file" => Some(&self.file),
            _ => None,
        }
    }

    fn from_draft(id: RecordId, draft: CreateCertification) -> Self {
        Self {
            id,
            name: draft.name,
            issuer: draft.issuer,
            year: draft.year,
            file: draft.file,
            origin: draft.origin,
        }
    }

    fn to_draft(&self) -> CreateCertification {
        CreateCertification {
            name: self.name.clone(),
            issuer: self.issuer.clone(),
            year: self.year,
            file: self.file.clone(),
            origin: self.origin,
        }
    }

    fn merge_draft(&mut self, draft: CreateCertification) {
        *self = Self::from_draft(self.id, draft);
    }

    fn apply_patch(&mut self, patch: UpdateCertification) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.issuer {
            self.issuer = v;
        }
        if let Some(v) = patch.year {
            self.year = v;
        }
    }
}

impl RecordListController<Certification> {
    /// Add one entry per uploaded file, stamped with `year`.
    pub fn upload_certificates<'a>(
        &mut self,
        file_names: impl IntoIterator<Item = &'a str>,
        year: i32,
    ) -> Vec<Certification> {
        file_names
            .into_iter()
            .map(|name| self.add_record(CreateCertification::from_upload(name, year)))
            .collect()
    }
}

pub fn seed_certifications() -> Vec<Certification> {
    vec![
        Certification {
            id: 1,
            name: "Certified Realtime Reporter (CRR)".to_string(),
            issuer: "NCRA".to_string(),
            year: 2020,
            file: "crr-cert.pdf".to_string(),
            origin: CertificationOrigin::Issued,
        },
        Certification {
            id: 2,
            name: "Registered Professional Reporter (RPR)".to_string(),
            issuer: "NCRA".to_string(),
            year: 2018,
            file: "rpr-cert.pdf".to_string(),
            origin: CertificationOrigin::Issued,
        },
    ]
}

pub fn certification_controller() -> Result<CertificationList, CoreError> {
    RecordListController::with_records(CERTIFICATION_LIST, seed_certifications())
}
