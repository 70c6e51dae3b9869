//! HTTP server setup (axum based).

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{Credentials, SessionManager};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::EntityStore;
use crate::upload::UploadManager;
use crate::web_api;

/// Shared application state handed to every handler.
///
/// The entity stores are the only shared mutable resources; everything else
/// reads snapshots from them.
#[derive(Clone)]
pub struct AppState {
    pub appointments: Arc<Mutex<EntityStore<Appointment>>>,
    pub prescriptions: Arc<Mutex<EntityStore<Prescription>>>,
    pub reminders: Arc<Mutex<EntityStore<Reminder>>>,
    pub documents: Arc<Mutex<EntityStore<Document>>>,
    pub sessions: Arc<Mutex<SessionManager>>,
    pub uploads: Arc<Mutex<UploadManager>>,
}

impl AppState {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            appointments: Arc::new(Mutex::new(EntityStore::new())),
            prescriptions: Arc::new(Mutex::new(EntityStore::new())),
            reminders: Arc::new(Mutex::new(EntityStore::new())),
            documents: Arc::new(Mutex::new(EntityStore::new())),
            sessions: Arc::new(Mutex::new(SessionManager::new(credentials))),
            uploads: Arc::new(Mutex::new(UploadManager::new())),
        }
    }

    /// State pre-populated with the built-in sample records.
    pub fn with_demo_data(credentials: Credentials) -> AppResult<Self> {
        let state = Self::new(credentials);
        seed_demo_data(&state)?;
        Ok(state)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // All demo dates are valid calendar dates.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seed_demo_data(state: &AppState) -> AppResult<()> {
    let mut appointments = state
        .appointments
        .lock()
        .map_err(|_| AppError::Custom("appointment store lock poisoned".to_string()))?;
    appointments.create(AppointmentDraft {
        doctor_name: "Dr. Sarah Johnson".to_string(),
        specialty: Some(Specialty::Cardiology),
        date: Some(date(2025, 4, 20)),
        time: "10:00 AM".to_string(),
        location: "City Healthcare Center - 123 Medical Blvd, Suite 101".to_string(),
        phone_number: Some("(555) 123-4567".to_string()),
        notes: Some("Follow-up on blood pressure medication".to_string()),
    })?;
    appointments.create(AppointmentDraft {
        doctor_name: "Dr. Michael Chen".to_string(),
        specialty: Some(Specialty::Dermatology),
        date: Some(date(2025, 4, 25)),
        time: "2:30 PM".to_string(),
        location: "Skin Specialists Clinic - 456 Health Ave".to_string(),
        phone_number: Some("(555) 987-6543".to_string()),
        notes: Some("Annual skin check".to_string()),
    })?;
    appointments.create(AppointmentDraft {
        doctor_name: "Dr. Emily Rodriguez".to_string(),
        specialty: Some(Specialty::GeneralPractice),
        date: Some(date(2025, 5, 5)),
        time: "9:15 AM".to_string(),
        location: "Community Medical Center - 789 Wellness St".to_string(),
        phone_number: Some("(555) 234-5678".to_string()),
        notes: Some("Annual physical examination".to_string()),
    })?;
    drop(appointments);

    let mut prescriptions = state
        .prescriptions
        .lock()
        .map_err(|_| AppError::Custom("prescription store lock poisoned".to_string()))?;
    prescriptions.create(PrescriptionDraft {
        name: "Lisinopril".to_string(),
        dosage: "10mg".to_string(),
        frequency: Some(Frequency::OnceDaily),
        start_date: Some(date(2025, 3, 1)),
        end_date: Some(date(2025, 9, 1)),
        refill_date: Some(date(2025, 5, 15)),
        prescribed_by: "Dr. Sarah Johnson".to_string(),
        notes: Some("Take in the morning with food".to_string()),
    })?;
    prescriptions.create(PrescriptionDraft {
        name: "Metformin".to_string(),
        dosage: "500mg".to_string(),
        frequency: Some(Frequency::TwiceDaily),
        start_date: Some(date(2025, 2, 15)),
        end_date: Some(date(2025, 8, 15)),
        refill_date: Some(date(2025, 5, 10)),
        prescribed_by: "Dr. Emily Rodriguez".to_string(),
        notes: Some("Take with breakfast and dinner".to_string()),
    })?;
    prescriptions.create(PrescriptionDraft {
        name: "Atorvastatin".to_string(),
        dosage: "20mg".to_string(),
        frequency: Some(Frequency::EveryEvening),
        start_date: Some(date(2025, 1, 10)),
        end_date: Some(date(2025, 7, 10)),
        refill_date: Some(date(2025, 4, 20)),
        prescribed_by: "Dr. Sarah Johnson".to_string(),
        notes: Some("Take before bedtime".to_string()),
    })?;
    drop(prescriptions);

    let mut reminders = state
        .reminders
        .lock()
        .map_err(|_| AppError::Custom("reminder store lock poisoned".to_string()))?;
    reminders.create(ReminderDraft {
        title: "Take Medication".to_string(),
        description: Some("Lisinopril 10mg".to_string()),
        time: "08:00".to_string(),
        recurring: true,
        days: vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ],
        date: None,
    })?;
    reminders.create(ReminderDraft {
        title: "Check Blood Pressure".to_string(),
        description: Some("Record results in health journal".to_string()),
        time: "19:00".to_string(),
        recurring: true,
        days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
        date: None,
    })?;
    reminders.create(ReminderDraft {
        title: "Annual Physical Examination".to_string(),
        description: Some("With Dr. Emily Rodriguez".to_string()),
        time: "14:30".to_string(),
        recurring: false,
        days: Vec::new(),
        date: Some(date(2025, 5, 15)),
    })?;
    reminders.create(ReminderDraft {
        title: "Eye Appointment".to_string(),
        description: Some("Vision check with Dr. Thompson".to_string()),
        time: "10:00".to_string(),
        recurring: false,
        days: Vec::new(),
        date: Some(date(2025, 6, 10)),
    })?;
    drop(reminders);

    let mut documents = state
        .documents
        .lock()
        .map_err(|_| AppError::Custom("document store lock poisoned".to_string()))?;
    documents.create(DocumentDraft {
        title: "Blood Test Results".to_string(),
        date: Some(date(2025, 4, 10)),
        category: Some(DocumentCategory::LabResults),
        file_size: "1.2 MB".to_string(),
        file_type: "PDF".to_string(),
    })?;
    documents.create(DocumentDraft {
        title: "Cardiology Report".to_string(),
        date: Some(date(2025, 4, 5)),
        category: Some(DocumentCategory::MedicalReports),
        file_size: "0.8 MB".to_string(),
        file_type: "PDF".to_string(),
    })?;
    documents.create(DocumentDraft {
        title: "Chest X-Ray".to_string(),
        date: Some(date(2025, 3, 20)),
        category: Some(DocumentCategory::Imaging),
        file_size: "5.4 MB".to_string(),
        file_type: "DICOM".to_string(),
    })?;
    documents.create(DocumentDraft {
        title: "Prescription - Antibiotics".to_string(),
        date: Some(date(2025, 3, 15)),
        category: Some(DocumentCategory::Prescriptions),
        file_size: "0.3 MB".to_string(),
        file_type: "PDF".to_string(),
    })?;
    documents.create(DocumentDraft {
        title: "Insurance Claim Form".to_string(),
        date: Some(date(2025, 3, 1)),
        category: Some(DocumentCategory::Insurance),
        file_size: "0.5 MB".to_string(),
        file_type: "PDF".to_string(),
    })?;

    log::info!("Demo data seeded");
    Ok(())
}

/// Starts the HTTP server and serves until shutdown.
pub async fn start_server(port: u16, state: AppState) -> AppResult<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = web_api::create_router(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("HTTP server listening on http://0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Transport(format!("server bind error: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Transport(format!("server error: {e}")))?;

    Ok(())
}
