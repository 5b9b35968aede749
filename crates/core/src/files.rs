//! Transcripts, recordings and exhibits attached to jobs.

use serde::{Deserialize, Serialize};

use crate::controller::RecordListController;
use crate::error::{CoreError, FieldError};
use crate::record::{parse_optional_date, unknown_field, Draft, Record};
use crate::status::Status;
use crate::types::{parse_date, Date, EntityKind, RecordId};
use crate::view::ListConfig;

define_status_enum! {
    /// Document type, derived from the file extension.
    FileType (initial = Other) {
        Pdf => "PDF",
        Doc => "DOC",
        Docx => "DOCX",
        Mp4 => "MP4",
        Mov => "MOV",
        Jpg => "JPG",
        Png => "PNG",
        Other => "OTHER",
    }
}

/// Extensions the upload dialog accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "png", "mp4", "mov"];

impl FileType {
    /// Type for a file name, by extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Self {
        match extension(name).as_deref() {
            Some("pdf") => Self::Pdf,
            Some("doc") => Self::Doc,
            Some("docx") => Self::Docx,
            Some("mp4") => Self::Mp4,
            Some("mov") => Self::Mov,
            Some("jpg") | Some("jpeg") => Self::Jpg,
            Some("png") => Self::Png,
            _ => Self::Other,
        }
    }
}

fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether the upload dialog accepts `name`.
pub fn is_accepted(name: &str) -> bool {
    extension(name).is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

pub const FILE_LIST: ListConfig = ListConfig {
    searchable_fields: &["name", "job_title"],
    required_fields: &["name"],
};

pub type FileList = RecordListController<FileAsset>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAsset {
    pub id: RecordId,
    pub name: String,
    pub file_type: FileType,
    pub size_bytes: u64,
    pub upload_date: Option<Date>,
    /// Job reference, e.g. `JOB-2024-001`.
    pub associated_job: String,
    pub job_title: String,
}

impl FileAsset {
    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Draft produced by the upload dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFileAsset {
    pub name: String,
    pub size_bytes: u64,
    pub upload_date: Option<Date>,
    pub associated_job: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateFileAsset {
    pub name: Option<String>,
    pub associated_job: Option<String>,
    pub job_title: Option<String>,
}

impl Draft for CreateFileAsset {
    fn empty() -> Self {
        Self {
            name: String::new(),
            size_bytes: 0,
            upload_date: None,
            associated_job: String::new(),
            job_title: String::new(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "name" => self.name = value.trim().to_string(),
            "size_bytes" => {
                self.size_bytes = value.trim().parse().map_err(|_| {
                    CoreError::Validation(format!("size_bytes must be a number, got '{value}'"))
                })?
            }
            "upload_date" => self.upload_date = parse_optional_date(field, value)?,
            "associated_job" => self.associated_job = value.trim().to_string(),
            "job_title" => self.job_title = value.to_string(),
            other => return Err(unknown_field("file", other)),
        }
        Ok(())
    }

    fn is_blank(&self, field: &str) -> bool {
        match field {
            "name" => self.name.is_empty(),
            "upload_date" => self.upload_date.is_none(),
            "associated_job" => self.associated_job.is_empty(),
            "job_title" => self.job_title.trim().is_empty(),
            _ => false,
        }
    }

    fn check(&self) -> Vec<FieldError> {
        if is_accepted(&self.name) {
            Vec::new()
        } else {
            vec![FieldError::new(
                "name",
                format!(
                    "Unsupported file type. Accepted: {}",
                    ACCEPTED_EXTENSIONS.join(", ")
                ),
            )]
        }
    }
}

impl Record for FileAsset {
    type Status = FileType;
    type Draft = CreateFileAsset;
    type Patch = UpdateFileAsset;

    const KIND: EntityKind = EntityKind::File;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn status(&self) -> FileType {
        self.file_type
    }

    fn date(&self) -> Option<Date> {
        self.upload_date
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "job_title" => Some(&self.job_title),
            "associated_job" => Some(&self.associated_job),
            _ => None,
        }
    }

    fn from_draft(id: RecordId, draft: CreateFileAsset) -> Self {
        Self {
            id,
            file_type: FileType::from_file_name(&draft.name),
            name: draft.name,
            size_bytes: draft.size_bytes,
            upload_date: draft.upload_date,
            associated_job: draft.associated_job,
            job_title: draft.job_title,
        }
    }

    fn to_draft(&self) -> CreateFileAsset {
        CreateFileAsset {
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            upload_date: self.upload_date,
            associated_job: self.associated_job.clone(),
            job_title: self.job_title.clone(),
        }
    }

    fn merge_draft(&mut self, draft: CreateFileAsset) {
        *self = Self::from_draft(self.id, draft);
    }

    fn apply_patch(&mut self, patch: UpdateFileAsset) {
        if let Some(v) = patch.name {
            self.file_type = FileType::from_file_name(&v);
            self.name = v;
        }
        if let Some(v) = patch.associated_job {
            self.associated_job = v;
        }
        if let Some(v) = patch.job_title {
            self.job_title = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// One file picked in the upload dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub size_bytes: u64,
}

/// Result of a multi-file upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub stored: Vec<FileAsset>,
    pub rejected: Vec<String>,
}

impl UploadReport {
    /// `"2 file(s) uploaded successfully!"`.
    pub fn message(&self) -> String {
        format!("{} file(s) uploaded successfully!", self.stored.len())
    }
}

impl RecordListController<FileAsset> {
    /// Store every accepted upload under `job`; unsupported names are
    /// reported back rather than stored.
    pub fn upload(
        &mut self,
        uploads: Vec<FileUpload>,
        associated_job: &str,
        job_title: &str,
        today: Date,
    ) -> UploadReport {
        let mut report = UploadReport {
            stored: Vec::new(),
            rejected: Vec::new(),
        };
        for upload in uploads {
            if !is_accepted(&upload.name) {
                tracing::debug!(name = %upload.name, "Rejected upload with unsupported type");
                report.rejected.push(upload.name);
                continue;
            }
            let stored = self.add_record(CreateFileAsset {
                name: upload.name,
                size_bytes: upload.size_bytes,
                upload_date: Some(today),
                associated_job: associated_job.to_string(),
                job_title: job_title.to_string(),
            });
            report.stored.push(stored);
        }
        report
    }

    /// Message for an empty grid: no match vs nothing uploaded yet.
    pub fn empty_message(&self) -> &'static str {
        if self.criteria().is_active() {
            "No files match your search criteria."
        } else {
            "Upload your first document to get started."
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub total_files: usize,
    pub total_bytes: u64,
    pub by_type: Vec<(FileType, usize)>,
}

impl FileStats {
    pub fn compute(files: &[FileAsset]) -> Self {
        let by_type = FileType::ALL
            .iter()
            .map(|&t| (t, files.iter().filter(|f| f.file_type == t).count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        Self {
            total_files: files.len(),
            total_bytes: files
                .iter()
                .fold(0u64, |acc, f| acc.saturating_add(f.size_bytes)),
            by_type,
        }
    }

    pub fn display_total_size(&self) -> String {
        format_size(self.total_bytes)
    }
}

/// Human size with decimal units, e.g. `2.4 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GB", 1_000_000_000), ("MB", 1_000_000), ("KB", 1_000)];
    for (unit, scale) in UNITS {
        if bytes >= scale {
            return format!("{:.1} {unit}", bytes as f64 / scale as f64);
        }
    }
    format!("{bytes} B")
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

fn file(
    id: RecordId,
    name: &str,
    size_bytes: u64,
    date: &str,
    job: &str,
    title: &str,
) -> FileAsset {
    FileAsset {
        id,
        name: name.to_string(),
        file_type: FileType::from_file_name(name),
        size_bytes,
        upload_date: parse_date(date),
        associated_job: job.to_string(),
        job_title: title.to_string(),
    }
}

#[rustfmt::skip]
pub fn seed_files() -> Vec<FileAsset> {
    vec![
        file(1, "family_court_transcript_001.pdf", 2_400_000, "2024-01-15", "JOB-2024-001",
            "Family Court Hearing"),
        file(2, "criminal_case_audio.mp4", 45_200_000, "2024-01-20", "JOB-2024-002",
            "Criminal Case Deposition"),
        file(3, "civil_litigation_notes.docx", 1_100_000, "2024-01-10", "JOB-2024-003",
            "Civil Litigation"),
        file(4, "contract_review_evidence.jpg", 3_700_000, "2024-01-18", "JOB-2024-004",
            "Contract Review"),
        file(5, "appeal_documents.pdf", 5_800_000, "2024-01-22", "JOB-2024-005",
            "Criminal Appeal"),
    ]
}

pub fn file_controller() -> Result<FileList, CoreError> {
    RecordListController::with_records(FILE_LIST, seed_files())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::StatusFilter;

    #[test]
    fn type_from_extension() {
        assert_eq!(FileType::from_file_name("a.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_file_name("clip.mov"), FileType::Mov);
        assert_eq!(FileType::from_file_name("photo.jpeg"), FileType::Jpg);
        assert_eq!(FileType::from_file_name("archive.zip"), FileType::Other);
        assert_eq!(FileType::from_file_name("README"), FileType::Other);
        assert_eq!(FileType::from_file_name(".pdf"), FileType::Other);
    }

    #[test]
    fn accepted_extensions() {
        assert!(is_accepted("notes.docx"));
        assert!(!is_accepted("notes.txt"));
        assert!(!is_accepted("pdf"));
    }

    #[test]
    fn search_matches_name_or_job_title() {
        let mut ctl = file_controller().unwrap();
        ctl.set_search_text("criminal");
        let names: Vec<_> = ctl.view().visible.into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["criminal_case_audio.mp4", "appeal_documents.pdf"]);
    }

    #[test]
    fn type_filter_combines_with_search() {
        let mut ctl = file_controller().unwrap();
        ctl.set_search_text("criminal");
        ctl.set_status_filter(StatusFilter::Only(FileType::Pdf));
        let view = ctl.view();
        assert_eq!(view.visible_len(), 1);
        assert_eq!(view.visible[0].id, 5);
        assert_eq!(view.count(StatusFilter::Only(FileType::Pdf)), 2);
    }

    #[test]
    fn upload_stores_accepted_and_reports_rejected() {
        let mut ctl = file_controller().unwrap();
        let today = parse_date("2024-02-01").unwrap();
        let report = ctl.upload(
            vec![
                FileUpload { name: "exhibit_a.png".into(), size_bytes: 512_000 },
                FileUpload { name: "malware.exe".into(), size_bytes: 10 },
            ],
            "JOB-2024-006",
            "Divorce Proceeding",
            today,
        );
        assert_eq!(report.stored.len(), 1);
        assert_eq!(report.stored[0].id, 6);
        assert_eq!(report.stored[0].file_type, FileType::Png);
        assert_eq!(report.stored[0].upload_date, Some(today));
        assert_eq!(report.rejected, vec!["malware.exe".to_string()]);
        assert_eq!(report.message(), "1 file(s) uploaded successfully!");
        assert_eq!(ctl.records().len(), 6);
    }

    #[test]
    fn unsupported_type_fails_form_check() {
        let mut draft = CreateFileAsset::empty();
        draft.set_field("name", "notes.txt").unwrap();
        assert_eq!(draft.check().len(), 1);
    }

    #[test]
    fn stats_and_sizes() {
        let stats = FileStats::compute(&seed_files());
        assert_eq!(stats.total_files, 5);
        assert_eq!(stats.total_bytes, 58_200_000);
        assert_eq!(stats.display_total_size(), "58.2 MB");
        assert!(stats.by_type.contains(&(FileType::Pdf, 2)));
        assert!(!stats.by_type.iter().any(|(t, _)| *t == FileType::Mov));
        assert_eq!(seed_files()[0].display_size(), "2.4 MB");
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(1_500), "1.5 KB");
    }

    #[test]
    fn stats_total_saturates_on_huge_uploads() {
        let mut files = seed_files();
        files[0].size_bytes = u64::MAX;
        files[1].size_bytes = u64::MAX;
        let stats = FileStats::compute(&files);
        assert_eq!(stats.total_bytes, u64::MAX);
        assert_eq!(stats.total_files, 5);
    }

    #[test]
    fn empty_message_depends_on_filters() {
        let mut ctl = file_controller().unwrap();
        assert_eq!(ctl.empty_message(), "Upload your first document to get started.");
        ctl.set_search_text("nothing-here");
        assert!(ctl.view().is_empty());
        assert_eq!(ctl.empty_message(), "No files match your search criteria.");
    }
}
