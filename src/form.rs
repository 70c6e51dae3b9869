//! Form staging buffer.
//!
//! Transient edit state between a selected record (or a blank template) and a
//! commit back into the store. The buffer holds exactly one typed draft;
//! commit validates the required fields for that kind and writes through to
//! the matching [`EntityStore`]. A failed validation leaves both the buffer
//! and the store untouched.

use chrono::NaiveTime;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::EntityStore;

/// How the buffer was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingMode {
    /// Blank template, no bound id.
    Create,
    /// Copy of an existing record, bound to its id.
    Edit(u64),
}

/// The draft being edited, tagged by entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedDraft {
    Appointment(AppointmentDraft),
    Prescription(PrescriptionDraft),
    Reminder(ReminderDraft),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormStagingBuffer {
    mode: StagingMode,
    draft: StagedDraft,
}

impl FormStagingBuffer {
    pub fn create_appointment() -> Self {
        Self {
            mode: StagingMode::Create,
            draft: StagedDraft::Appointment(AppointmentDraft::default()),
        }
    }

    pub fn edit_appointment(appointment: &Appointment) -> Self {
        Self {
            mode: StagingMode::Edit(appointment.id),
            draft: StagedDraft::Appointment(appointment.draft()),
        }
    }

    pub fn create_prescription() -> Self {
        Self {
            mode: StagingMode::Create,
            draft: StagedDraft::Prescription(PrescriptionDraft::default()),
        }
    }

    pub fn edit_prescription(prescription: &Prescription) -> Self {
        Self {
            mode: StagingMode::Edit(prescription.id),
            draft: StagedDraft::Prescription(prescription.draft()),
        }
    }

    pub fn create_reminder() -> Self {
        Self {
            mode: StagingMode::Create,
            draft: StagedDraft::Reminder(ReminderDraft::default()),
        }
    }

    pub fn edit_reminder(reminder: &Reminder) -> Self {
        Self {
            mode: StagingMode::Edit(reminder.id),
            draft: StagedDraft::Reminder(reminder.draft()),
        }
    }

    pub fn mode(&self) -> StagingMode {
        self.mode
    }

    pub fn appointment_mut(&mut self) -> Option<&mut AppointmentDraft> {
        match &mut self.draft {
            StagedDraft::Appointment(d) => Some(d),
            _ => None,
        }
    }

    pub fn prescription_mut(&mut self) -> Option<&mut PrescriptionDraft> {
        match &mut self.draft {
            StagedDraft::Prescription(d) => Some(d),
            _ => None,
        }
    }

    pub fn reminder_mut(&mut self) -> Option<&mut ReminderDraft> {
        match &mut self.draft {
            StagedDraft::Reminder(d) => Some(d),
            _ => None,
        }
    }

    /// Toggles the recurring flag on a staged reminder.
    ///
    /// The one cross-field rule: switching to recurring clears the one-off
    /// date; switching away clears the weekday set.
    pub fn set_recurring(&mut self, recurring: bool) {
        if let StagedDraft::Reminder(draft) = &mut self.draft {
            draft.recurring = recurring;
            if recurring {
                draft.date = None;
            } else {
                draft.days.clear();
            }
        }
    }

    /// Validates the staged draft against its kind's required fields.
    pub fn validate(&self) -> AppResult<()> {
        match &self.draft {
            StagedDraft::Appointment(d) => validate_appointment(d),
            StagedDraft::Prescription(d) => validate_prescription(d),
            StagedDraft::Reminder(d) => validate_reminder(d),
        }
    }

    /// Validates and writes the staged appointment through to the store.
    pub fn commit_appointment(
        &self,
        store: &mut EntityStore<Appointment>,
    ) -> AppResult<Appointment> {
        let draft = match &self.draft {
            StagedDraft::Appointment(d) => d.clone(),
            _ => return Err(AppError::Custom("staged draft is not an appointment".to_string())),
        };
        validate_appointment(&draft)?;
        match self.mode {
            StagingMode::Create => store.create(draft),
            StagingMode::Edit(id) => store.update(id, draft),
        }
    }

    /// Validates and writes the staged prescription through to the store.
    pub fn commit_prescription(
        &self,
        store: &mut EntityStore<Prescription>,
    ) -> AppResult<Prescription> {
        let draft = match &self.draft {
            StagedDraft::Prescription(d) => d.clone(),
            _ => return Err(AppError::Custom("staged draft is not a prescription".to_string())),
        };
        validate_prescription(&draft)?;
        match self.mode {
            StagingMode::Create => store.create(draft),
            StagingMode::Edit(id) => store.update(id, draft),
        }
    }

    /// Validates and writes the staged reminder through to the store.
    pub fn commit_reminder(&self, store: &mut EntityStore<Reminder>) -> AppResult<Reminder> {
        let draft = match &self.draft {
            StagedDraft::Reminder(d) => d.clone(),
            _ => return Err(AppError::Custom("staged draft is not a reminder".to_string())),
        };
        validate_reminder(&draft)?;
        match self.mode {
            StagingMode::Create => store.create(draft),
            StagingMode::Edit(id) => store.update(id, draft),
        }
    }

    /// Discards the buffer without touching any store.
    pub fn cancel(self) {}
}

fn require(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn validate_appointment(draft: &AppointmentDraft) -> AppResult<()> {
    require(&draft.doctor_name, "doctor name")?;
    require(&draft.time, "time")?;
    if draft.specialty.is_none() {
        return Err(AppError::Validation("specialty is required".to_string()));
    }
    if draft.date.is_none() {
        return Err(AppError::Validation("date is required".to_string()));
    }
    Ok(())
}

fn validate_prescription(draft: &PrescriptionDraft) -> AppResult<()> {
    require(&draft.name, "name")?;
    require(&draft.dosage, "dosage")?;
    require(&draft.prescribed_by, "prescribed by")?;
    if draft.frequency.is_none() {
        return Err(AppError::Validation("frequency is required".to_string()));
    }
    Ok(())
}

fn validate_reminder(draft: &ReminderDraft) -> AppResult<()> {
    require(&draft.title, "title")?;
    require(&draft.time, "time")?;
    if NaiveTime::parse_from_str(&draft.time, "%H:%M").is_err() {
        return Err(AppError::Validation(format!("invalid time \"{}\"", draft.time)));
    }
    if draft.recurring {
        if draft.days.is_empty() {
            return Err(AppError::Validation(
                "a recurring reminder needs at least one weekday".to_string(),
            ));
        }
        if draft.date.is_some() {
            return Err(AppError::Validation(
                "a recurring reminder cannot have a one-off date".to_string(),
            ));
        }
    } else {
        if draft.date.is_none() {
            return Err(AppError::Validation("date is required".to_string()));
        }
        if !draft.days.is_empty() {
            return Err(AppError::Validation(
                "a one-off reminder cannot have weekdays".to_string(),
            ));
        }
    }
    Ok(())
}
