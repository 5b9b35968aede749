//! Account preferences: language, notification channels, calendar sync.

use serde::{Deserialize, Serialize};

use crate::confirm::Decision;
use crate::error::CoreError;
use crate::pending::{Outcome, SaveStatus};
use crate::record::parse_bool;

define_status_enum! {
    Language (initial = En) {
        En => "en",
        Es => "es",
        Fr => "fr",
        De => "de",
        It => "it",
    }
}

impl Language {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::It => "Italian",
        }
    }
}

define_status_enum! {
    CalendarProvider (initial = Google) {
        Google => "google",
        Apple => "apple",
    }
}

impl CalendarProvider {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Apple => "Apple",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub language: Language,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub sms_notifications: bool,
    pub calendar_sync: bool,
    pub calendar_provider: CalendarProvider,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::En,
            email_notifications: true,
            push_notifications: true,
            sms_notifications: false,
            calendar_sync: false,
            calendar_provider: CalendarProvider::Google,
        }
    }
}

impl Settings {
    /// Set one preference from its input name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "language" => self.language = Language::from_str(value)?,
            "email_notifications" => self.email_notifications = parse_bool(key, value)?,
            "push_notifications" => self.push_notifications = parse_bool(key, value)?,
            "sms_notifications" => self.sms_notifications = parse_bool(key, value)?,
            other => {
                return Err(CoreError::Validation(format!("Unknown setting '{other}'")));
            }
        }
        Ok(())
    }
}

/// Settings page state: preferences plus the two simulated remote calls
/// (save, calendar connect).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPanel {
    settings: Settings,
    save: SaveStatus,
    calendar: SaveStatus,
    connecting: Option<CalendarProvider>,
    account_deletion_requested: bool,
}

impl SettingsPanel {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save
    }

    pub fn calendar_status(&self) -> &SaveStatus {
        &self.calendar
    }

    pub fn is_calendar_connected(&self) -> bool {
        self.settings.calendar_sync
    }

    pub fn is_busy(&self) -> bool {
        self.save.is_pending() || self.calendar.is_pending()
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.settings.set(key, value)
    }

    pub fn begin_save(&mut self) -> Result<(), CoreError> {
        self.save.begin()
    }

    pub fn settle_save(&mut self, outcome: Outcome) {
        if let Outcome::Failure(reason) = &outcome {
            tracing::warn!(%reason, "Settings save failed");
        }
        self.save.settle(outcome);
    }

    pub fn begin_calendar_connect(&mut self, provider: CalendarProvider) -> Result<(), CoreError> {
        self.calendar.begin()?;
        self.connecting = Some(provider);
        Ok(())
    }

    /// Finish a connect. Success turns sync on for the chosen provider.
    pub fn settle_calendar_connect(&mut self, outcome: Outcome) -> Result<String, CoreError> {
        let provider = self.connecting.take().ok_or_else(|| {
            CoreError::Conflict("No calendar connection is pending".to_string())
        })?;
        let message = if outcome.is_success() {
            self.settings.calendar_sync = true;
            self.settings.calendar_provider = provider;
            tracing::info!(provider = %provider, "Calendar connected");
            format!("Connected to {} Calendar successfully!", provider.display_name())
        } else {
            format!("Could not connect to {} Calendar", provider.display_name())
        };
        self.calendar.settle(outcome);
        Ok(message)
    }

    pub fn disconnect_calendar(&mut self) {
        self.settings.calendar_sync = false;
        self.calendar = SaveStatus::Idle;
    }

    /// Start account deletion. A declined prompt changes nothing and
    /// returns `false`.
    pub fn request_account_deletion(&mut self, decision: Decision) -> bool {
        decision
            .run(|| {
                self.account_deletion_requested = true;
                tracing::info!("Account deletion requested");
            })
            .is_some()
    }

    pub fn account_deletion_requested(&self) -> bool {
        self.account_deletion_requested
    }
}
