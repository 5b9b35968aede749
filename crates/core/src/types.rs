use serde::{Deserialize, Serialize};

/// Store-assigned record identity. Monotonic per store, never reused.
pub type RecordId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date without a timezone (`YYYY-MM-DD` on the wire).
pub type Date = chrono::NaiveDate;

/// The entity kinds that each own an independent record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Job,
    Bill,
    File,
    Notification,
    Holiday,
    Certification,
}

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[
        Self::Job,
        Self::Bill,
        Self::File,
        Self::Notification,
        Self::Holiday,
        Self::Certification,
    ];

    /// Stable snake_case name, used for logging and snapshot file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Bill => "bill",
            Self::File => "file",
            Self::Notification => "notification",
            Self::Holiday => "holiday",
            Self::Certification => "certification",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `YYYY-MM-DD` date as produced by a date input.
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Locale-style short date, e.g. `Jan 15, 2024`.
pub fn format_date(date: Date) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(parse_date("2024-02-15"), Date::from_ymd_opt(2024, 2, 15));
        assert_eq!(parse_date(" 2024-02-15 "), Date::from_ymd_opt(2024, 2, 15));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("15/02/2024"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn format_date_is_short_month() {
        let date = Date::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2024");
    }

    #[test]
    fn entity_kind_names_are_unique() {
        let mut names: Vec<_> = EntityKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EntityKind::ALL.len());
    }
}
