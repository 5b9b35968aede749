//! Job alerts, payments, reminders and feedback, with read tracking.

use serde::{Deserialize, Serialize};

use crate::controller::RecordListController;
use crate::criteria::StatusFilter;
use crate::error::CoreError;
use crate::record::{unknown_field, Draft, Record};
use crate::status::Status;
use crate::types::{EntityKind, RecordId};
use crate::view::ListConfig;

define_status_enum! {
    /// Read tracking; drives the All / Unread / Read tabs.
    ReadState (initial = Unread) {
        Unread => "unread",
        Read => "read",
    }
}

define_status_enum! {
    Priority (initial = Medium) {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

define_status_enum! {
    NotificationType (initial = Job) {
        Job => "job",
        Payment => "payment",
        File => "file",
        Reminder => "reminder",
        Feedback => "feedback",
    }
}

pub const NOTIFICATION_LIST: ListConfig = ListConfig {
    searchable_fields: &["title", "message"],
    required_fields: &["title", "message"],
};

pub type NotificationList = RecordListController<Notification>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    /// Relative time label as delivered, e.g. `"2 minutes ago"`.
    pub time: String,
    pub read_state: ReadState,
    pub priority: Priority,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_state == ReadState::Unread
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNotification {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub time: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateNotification {
    pub read_state: Option<ReadState>,
    pub priority: Option<Priority>,
}

impl Draft for CreateNotification {
    fn empty() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            notification_type: NotificationType::INITIAL,
            time: "just now".to_string(),
            priority: Priority::INITIAL,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "title" => self.title = value.to_string(),
            "message" => self.message = value.to_string(),
            "notification_type" => self.notification_type = NotificationType::from_str(value)?,
            "time" => self.time = value.to_string(),
            "priority" => self.priority = Priority::from_str(value)?,
            other => return Err(unknown_field("notification", other)),
        }
        Ok(())
    }

    fn is_blank(&self, field: &str) -> bool {
        match field {
            "title" => self.title.trim().is_empty(),
            "message" => self.message.trim().is_empty(),
            "time" => self.time.trim().is_empty(),
            _ => false,
        }
    }
}

impl Record for Notification {
    type Status = ReadState;
    type Draft = CreateNotification;
    type Patch = UpdateNotification;

    const KIND: EntityKind = EntityKind::Notification;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn status(&self) -> ReadState {
        self.read_state
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "message" => Some(&self.message),
            _ => None,
        }
    }

    fn from_draft(id: RecordId, draft: CreateNotification) -> Self {
        Self {
            id,
            title: draft.title,
            message: draft.message,
            notification_type: draft.notification_type,
            time: draft.time,
            read_state: ReadState::Unread,
            priority: draft.priority,
        }
    }

    fn to_draft(&self) -> CreateNotification {
        CreateNotification {
            title: self.title.clone(),
            message: self.message.clone(),
            notification_type: self.notification_type,
            time: self.time.clone(),
            priority: self.priority,
        }
    }

    fn merge_draft(&mut self, draft: CreateNotification) {
        self.title = draft.title;
        self.message = draft.message;
        self.notification_type = draft.notification_type;
        self.time = draft.time;
        self.priority = draft.priority;
    }

    fn apply_patch(&mut self, patch: UpdateNotification) {
        if let Some(v) = patch.read_state {
            self.read_state = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
    }
}

impl RecordListController<Notification> {
    pub fn mark_read(&mut self, id: RecordId) -> bool {
        self.edit_record(
            id,
            UpdateNotification {
                read_state: Some(ReadState::Read),
                ..UpdateNotification::default()
            },
        )
    }

    pub fn mark_all_read(&mut self) {
        self.edit_all(|n| n.read_state = ReadState::Read);
    }

    /// Drop every read notification. Returns how many were removed.
    pub fn clear_all_read(&mut self) -> usize {
        self.retain(Notification::is_unread)
    }

    pub fn unread_count(&self) -> usize {
        self.records().iter().filter(|n| n.is_unread()).count()
    }

    /// First `n` notifications for the header dropdown.
    pub fn recent(&self, n: usize) -> &[Notification] {
        let records = self.records();
        &records[..n.min(records.len())]
    }

    /// Text for an empty list under the active tab.
    pub fn empty_message(&self) -> &'static str {
        match self.criteria().status {
            StatusFilter::Only(ReadState::Unread) => "All caught up! No unread notifications.",
            _ => "No notifications to show.",
        }
    }
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

fn notification(
    id: RecordId,
    title: &str,
    message: &str,
    notification_type: NotificationType,
    time: &str,
    read_state: ReadState,
    priority: Priority,
) -> Notification {
    Notification {
        id,
        title: title.to_string(),
        message: message.to_string(),
        notification_type,
        time: time.to_string(),
        read_state,
        priority,
    }
}

#[rustfmt::skip]
pub fn seed_notifications() -> Vec<Notification> {
    use NotificationType as T;
    use ReadState::*;
    vec![
        notification(1, "New job assigned",
            "Family Court Hearing scheduled for tomorrow at 10:00 AM in Courtroom 101",
            T::Job, "2 minutes ago", Unread, Priority::High),
        notification(2, "Payment received", "Invoice #INV-001 has been paid. Amount: $750.00",
            T::Payment, "1 hour ago", Unread, Priority::Medium),
        notification(3, "File uploaded successfully",
            "Transcript for case #5678 has been uploaded to the system",
            T::File, "3 hours ago", Read, Priority::Low),
        notification(4, "Reminder: Upcoming deadline",
            "Invoice #INV-002 is due in 2 days. Please ensure timely submission.",
            T::Reminder, "5 hours ago", Read, Priority::High),
        notification(5, "Feedback received",
            "Client has provided feedback for your recent work on case #1234",
            T::Feedback, "1 day ago", Read, Priority::Low),
    ]
}

pub fn notification_controller() -> Result<NotificationList, CoreError> {
    RecordListController::with_records(NOTIFICATION_LIST, seed_notifications())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_counts() {
        let view = notification_controller().unwrap().view();
        assert_eq!(view.count(StatusFilter::All), 5);
        assert_eq!(view.count(StatusFilter::Only(ReadState::Unread)), 2);
        assert_eq!(view.count(StatusFilter::Only(ReadState::Read)), 3);
    }

    #[test]
    fn mark_read_then_all_read() {
        let mut ctl = notification_controller().unwrap();
        assert!(ctl.mark_read(1));
        assert_eq!(ctl.unread_count(), 1);
        assert!(!ctl.mark_read(42));
        ctl.mark_all_read();
        assert_eq!(ctl.unread_count(), 0);
        assert_eq!(ctl.records().len(), 5);
    }

    #[test]
    fn clear_all_read_keeps_unread() {
        let mut ctl = notification_controller().unwrap();
        assert_eq!(ctl.clear_all_read(), 3);
        let ids: Vec<_> = ctl.records().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn unread_tab_empty_message() {
        let mut ctl = notification_controller().unwrap();
        ctl.mark_all_read();
        ctl.set_status_filter(StatusFilter::Only(ReadState::Unread));
        assert!(ctl.view().is_empty());
        assert_eq!(ctl.empty_message(), "All caught up! No unread notifications.");
        ctl.set_status_filter(StatusFilter::All);
        assert_eq!(ctl.empty_message(), "No notifications to show.");
    }

    #[test]
    fn recent_is_bounded() {
        let ctl = notification_controller().unwrap();
        assert_eq!(ctl.recent(3).len(), 3);
        assert_eq!(ctl.recent(10).len(), 5);
    }

    #[test]
    fn new_notification_starts_unread() {
        let mut ctl = notification_controller().unwrap();
        let mut draft = CreateNotification::empty();
        draft.set_field("title", "Hearing moved").unwrap();
        draft.set_field("priority", "high").unwrap();
        let created = ctl.add_record(draft);
        assert!(created.is_unread());
        assert_eq!(created.id, 6);
        assert!(CreateNotification::empty().set_field("priority", "urgent").is_err());
    }
}
