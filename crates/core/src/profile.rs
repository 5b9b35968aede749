//! The signed-in reporter's profile and its edit workflow.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldError};
use crate::pending::{Outcome, SaveStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub address: String,
    pub bio: String,
    /// Avatar image reference (data URL or path); `None` shows the icon.
    pub avatar: Option<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Tarun Goud".to_string(),
            email: "tarun@gmail.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            role: "Court Reporter".to_string(),
            address: "123 Main Street, Anytown, ST 12345".to_string(),
            bio: "Experienced court reporter with over 10 years in the field.".to_string(),
            avatar: None,
        }
    }
}

/// Editable copy of the profile bound to the form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: String,
    pub avatar: Option<String>,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.name.clone(),
            email: profile.email.clone(),
            phone_number: profile.phone.clone(),
            address: profile.address.clone(),
            bio: profile.bio.clone(),
            avatar: profile.avatar.clone(),
        }
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "full_name" => self.full_name = value.trim().to_string(),
            "email" => self.email = value.trim().to_string(),
            "phone_number" => self.phone_number = value.to_string(),
            "address" => self.address = value.to_string(),
            "bio" => self.bio = value.to_string(),
            "avatar" => {
                self.avatar = (!value.is_empty()).then(|| value.to_string());
            }
            other => return Err(crate::record::unknown_field("profile", other)),
        }
        Ok(())
    }

    /// Run the declarative checks, flattened to inline field errors.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|errors| CoreError::InvalidForm(field_errors(&errors)))
    }

    fn apply_to(self, profile: &mut UserProfile) {
        profile.name = self.full_name;
        profile.email = self.email;
        profile.phone = self.phone_number;
        profile.address = self.address;
        profile.bio = self.bio;
        profile.avatar = self.avatar;
    }
}

fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileMode {
    Viewing,
    Editing {
        form: ProfileForm,
        save: SaveStatus,
    },
}

/// Viewing/Editing state machine around a [`UserProfile`]. A save is a
/// two-step operation: [`begin_save`](Self::begin_save) validates and goes
/// pending, [`settle_save`](Self::settle_save) applies or keeps editing.
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    profile: UserProfile,
    mode: ProfileMode,
}

impl ProfileEditor {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            mode: ProfileMode::Viewing,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn mode(&self) -> &ProfileMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, ProfileMode::Editing { .. })
    }

    pub fn save_status(&self) -> SaveStatus {
        match &self.mode {
            ProfileMode::Editing { save, .. } => save.clone(),
            ProfileMode::Viewing => SaveStatus::Idle,
        }
    }

    pub fn start_editing(&mut self) {
        if !self.is_editing() {
            self.mode = ProfileMode::Editing {
                form: ProfileForm::from_profile(&self.profile),
                save: SaveStatus::Idle,
            };
        }
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match &mut self.mode {
            ProfileMode::Editing { form, save } if !save.is_pending() => {
                form.set_field(field, value)
            }
            ProfileMode::Editing { .. } => Err(CoreError::Conflict(
                "Profile save is in progress".to_string(),
            )),
            ProfileMode::Viewing => Err(CoreError::Conflict(
                "Profile is not being edited".to_string(),
            )),
        }
    }

    /// Validate the form and mark the save pending.
    pub fn begin_save(&mut self) -> Result<(), CoreError> {
        match &mut self.mode {
            ProfileMode::Editing { form, save } => {
                form.check()?;
                save.begin()
            }
            ProfileMode::Viewing => Err(CoreError::Conflict(
                "Profile is not being edited".to_string(),
            )),
        }
    }

    /// Complete a pending save. Success commits the form and returns to
    /// viewing; failure keeps the form open with the error recorded.
    pub fn settle_save(&mut self, outcome: Outcome) -> Result<(), CoreError> {
        let mode = std::mem::replace(&mut self.mode, ProfileMode::Viewing);
        match mode {
            ProfileMode::Editing { form, save } if save.is_pending() => {
                if outcome.is_success() {
                    form.apply_to(&mut self.profile);
                    tracing::info!(name = %self.profile.name, "Profile updated");
                } else {
                    tracing::warn!(?outcome, "Profile save failed");
                    self.mode = ProfileMode::Editing {
                        form,
                        save: SaveStatus::Settled(outcome),
                    };
                }
                Ok(())
            }
            other => {
                self.mode = other;
                Err(CoreError::Conflict("No profile save is pending".to_string()))
            }
        }
    }

    /// Drop unsaved changes.
    pub fn cancel(&mut self) {
        self.mode = ProfileMode::Viewing;
    }
}
