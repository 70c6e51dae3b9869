use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Medical specialties offered in the appointment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Specialty {
    Cardiology,
    Dermatology,
    Endocrinology,
    Gastroenterology,
    #[serde(rename = "General Practice")]
    GeneralPractice,
    Neurology,
    #[serde(rename = "Obstetrics & Gynecology")]
    ObstetricsGynecology,
    Oncology,
    Ophthalmology,
    Orthopedics,
    Pediatrics,
    Psychiatry,
    Pulmonology,
    Radiology,
    Urology,
}

impl Specialty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardiology => "Cardiology",
            Self::Dermatology => "Dermatology",
            Self::Endocrinology => "Endocrinology",
            Self::Gastroenterology => "Gastroenterology",
            Self::GeneralPractice => "General Practice",
            Self::Neurology => "Neurology",
            Self::ObstetricsGynecology => "Obstetrics & Gynecology",
            Self::Oncology => "Oncology",
            Self::Ophthalmology => "Ophthalmology",
            Self::Orthopedics => "Orthopedics",
            Self::Pediatrics => "Pediatrics",
            Self::Psychiatry => "Psychiatry",
            Self::Pulmonology => "Pulmonology",
            Self::Radiology => "Radiology",
            Self::Urology => "Urology",
        }
    }
}

/// Dosing frequency options for a prescription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "Once daily")]
    OnceDaily,
    #[serde(rename = "Twice daily")]
    TwiceDaily,
    #[serde(rename = "Three times daily")]
    ThreeTimesDaily,
    #[serde(rename = "Four times daily")]
    FourTimesDaily,
    #[serde(rename = "Every morning")]
    EveryMorning,
    #[serde(rename = "Every evening")]
    EveryEvening,
    #[serde(rename = "Every 4 hours")]
    Every4Hours,
    #[serde(rename = "Every 6 hours")]
    Every6Hours,
    #[serde(rename = "Every 8 hours")]
    Every8Hours,
    #[serde(rename = "Every 12 hours")]
    Every12Hours,
    #[serde(rename = "As needed")]
    AsNeeded,
    Other,
}

/// Three-letter weekday codes used by recurring reminders (Sun=0 .. Sat=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// Weekday code of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        match date.weekday() {
            chrono::Weekday::Sun => Self::Sun,
            chrono::Weekday::Mon => Self::Mon,
            chrono::Weekday::Tue => Self::Tue,
            chrono::Weekday::Wed => Self::Wed,
            chrono::Weekday::Thu => Self::Thu,
            chrono::Weekday::Fri => Self::Fri,
            chrono::Weekday::Sat => Self::Sat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
        }
    }
}

/// A scheduled visit with a healthcare provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub doctor_name: String,
    pub specialty: Specialty,
    pub date: NaiveDate,
    /// Display time as entered ("10:00 AM"); intentionally not normalized.
    pub time: String,
    pub location: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}

/// Editable appointment fields, staged before commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub doctor_name: String,
    pub specialty: Option<Specialty>,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub location: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn draft(&self) -> AppointmentDraft {
        AppointmentDraft {
            doctor_name: self.doctor_name.clone(),
            specialty: Some(self.specialty),
            date: Some(self.date),
            time: self.time.clone(),
            location: self.location.clone(),
            phone_number: self.phone_number.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// An active or historical medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: u64,
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub refill_date: Option<NaiveDate>,
    pub prescribed_by: String,
    pub notes: Option<String>,
}

/// Editable prescription fields, staged before commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionDraft {
    pub name: String,
    pub dosage: String,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub refill_date: Option<NaiveDate>,
    pub prescribed_by: String,
    pub notes: Option<String>,
}

impl Prescription {
    pub fn draft(&self) -> PrescriptionDraft {
        PrescriptionDraft {
            name: self.name.clone(),
            dosage: self.dosage.clone(),
            frequency: Some(self.frequency),
            start_date: self.start_date,
            end_date: self.end_date,
            refill_date: self.refill_date,
            prescribed_by: self.prescribed_by.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// A health reminder: either recurring on a weekday set, or one-off on a date.
///
/// Invariant: `days` is non-empty iff `recurring` is true; `date` is present
/// iff `recurring` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    /// 24-hour "HH:MM".
    pub time: String,
    pub recurring: bool,
    #[serde(default)]
    pub days: Vec<Weekday>,
    pub date: Option<NaiveDate>,
}

/// Editable reminder fields, staged before commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub title: String,
    pub description: Option<String>,
    pub time: String,
    pub recurring: bool,
    #[serde(default)]
    pub days: Vec<Weekday>,
    pub date: Option<NaiveDate>,
}

impl Reminder {
    pub fn draft(&self) -> ReminderDraft {
        ReminderDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            time: self.time.clone(),
            recurring: self.recurring,
            days: self.days.clone(),
            date: self.date,
        }
    }
}

/// Categories for filed medical documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCategory {
    #[serde(rename = "Lab Results")]
    LabResults,
    #[serde(rename = "Medical Reports")]
    MedicalReports,
    Imaging,
    Prescriptions,
    Insurance,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabResults => "Lab Results",
            Self::MedicalReports => "Medical Reports",
            Self::Imaging => "Imaging",
            Self::Prescriptions => "Prescriptions",
            Self::Insurance => "Insurance",
        }
    }
}

/// A filed medical document (metadata only; file storage is out of scope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    pub category: DocumentCategory,
    /// Display size as reported at upload ("1.2 MB").
    pub file_size: String,
    pub file_type: String,
}

/// Document metadata captured when an upload finishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub category: Option<DocumentCategory>,
    pub file_size: String,
    pub file_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_from_date_maps_sunday() {
        // 2025-05-11 is a Sunday, 2025-05-14 a Wednesday
        let sun = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap();
        let wed = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        assert_eq!(Weekday::from_date(sun), Weekday::Sun);
        assert_eq!(Weekday::from_date(wed), Weekday::Wed);
    }

    #[test]
    fn specialty_serializes_to_display_name() {
        let json = serde_json::to_string(&Specialty::ObstetricsGynecology).unwrap();
        assert_eq!(json, "\"Obstetrics & Gynecology\"");
        let back: Specialty = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Specialty::ObstetricsGynecology);
    }

    #[test]
    fn frequency_round_trips_through_json() {
        let json = serde_json::to_string(&Frequency::Every8Hours).unwrap();
        assert_eq!(json, "\"Every 8 hours\"");
        let back: Frequency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Frequency::Every8Hours);
    }

    #[test]
    fn reminder_draft_copies_all_fields() {
        let reminder = Reminder {
            id: 7,
            title: "Check Blood Pressure".to_string(),
            description: Some("Record results in health journal".to_string()),
            time: "19:00".to_string(),
            recurring: true,
            days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            date: None,
        };
        let draft = reminder.draft();
        assert_eq!(draft.title, reminder.title);
        assert_eq!(draft.days, reminder.days);
        assert!(draft.date.is_none());
    }
}
