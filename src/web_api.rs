//! REST API for the web client.
//!
//! One resource collection per entity kind, plus the derived schedule,
//! search, upload and assistant endpoints. Destructive-delete confirmation is
//! the caller's concern; the API just performs what it is asked.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::assistant;
use crate::error::AppError;
use crate::form::FormStagingBuffer;
use crate::models::*;
use crate::schedule;
use crate::search;
use crate::server::AppState;
use crate::upload::UploadRequest;

/// API response wrapper.
#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Token extracted from query parameters.
#[derive(Deserialize)]
pub struct AuthQuery {
    pub token: Option<String>,
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn err_response<T: Serialize>(error: AppError) -> Response {
    (status_for(&error), Json(ApiResponse::<T>::err(error))).into_response()
}

fn internal<T: Serialize>(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<T>::err(message)),
    )
        .into_response()
}

/// Session verification helper.
macro_rules! require_auth {
    ($state:expr, $query:expr) => {
        match $query.token.as_ref().and_then(|t| {
            $state
                .sessions
                .lock()
                .ok()
                .and_then(|sessions| sessions.verify(t))
        }) {
            Some(session) => session,
            None => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(ApiResponse::<()>::err("authentication required")),
                )
                    .into_response()
            }
        }
    };
}

/// Builds the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Auth
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/verify", get(verify_handler))
        // Appointments
        .route(
            "/api/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/api/appointments/upcoming", get(upcoming_appointments))
        .route(
            "/api/appointments/{id}",
            put(update_appointment).delete(delete_appointment),
        )
        // Prescriptions
        .route(
            "/api/prescriptions",
            get(list_prescriptions).post(create_prescription),
        )
        .route("/api/prescriptions/active", get(active_prescriptions))
        .route(
            "/api/prescriptions/{id}",
            put(update_prescription).delete(delete_prescription),
        )
        // Reminders
        .route("/api/reminders", get(list_reminders).post(create_reminder))
        .route("/api/reminders/today", get(todays_reminders_handler))
        .route("/api/reminders/upcoming", get(upcoming_reminders_handler))
        .route(
            "/api/reminders/{id}",
            put(update_reminder).delete(delete_reminder),
        )
        // Documents
        .route("/api/documents", get(list_documents))
        .route("/api/documents/upload", post(start_upload))
        .route(
            "/api/documents/upload/{task_id}",
            get(upload_progress).delete(cancel_upload),
        )
        // Assistant
        .route("/api/assistant", post(assistant_handler))
        .with_state(state)
}

/// Health check (no store access).
async fn health_handler() -> &'static str {
    "OK"
}

// ============ Auth ============

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    username: String,
}

async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let Ok(mut sessions) = state.sessions.lock() else {
        return internal::<LoginResponse>("session lock poisoned");
    };
    match sessions.login(&payload.username, &payload.password) {
        Ok(session) => Json(ApiResponse::ok(LoginResponse {
            token: session.token,
            username: session.username,
        }))
        .into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<LoginResponse>::err(
                "invalid username or password",
            )),
        )
            .into_response(),
    }
}

async fn logout_handler(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if let (Some(token), Ok(mut sessions)) = (query.token, state.sessions.lock()) {
        sessions.logout(&token);
    }
    Json(ApiResponse::ok(())).into_response()
}

async fn verify_handler(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    let valid = query
        .token
        .as_ref()
        .and_then(|t| state.sessions.lock().ok().and_then(|s| s.verify(t)))
        .is_some();
    Json(ApiResponse::ok(valid)).into_response()
}

// ============ Appointments ============

async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(store) = state.appointments.lock() else {
        return internal::<Vec<Appointment>>("appointment store lock poisoned");
    };
    Json(ApiResponse::ok(store.list())).into_response()
}

async fn upcoming_appointments(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(store) = state.appointments.lock() else {
        return internal::<Vec<Appointment>>("appointment store lock poisoned");
    };
    let today = Local::now().date_naive();
    let mut upcoming: Vec<Appointment> = store
        .list()
        .into_iter()
        .filter(|a| a.date >= today)
        .collect();
    upcoming.sort_by_key(|a| a.date);
    Json(ApiResponse::ok(upcoming)).into_response()
}

#[derive(Deserialize)]
struct CreateAppointmentRequest {
    #[serde(flatten)]
    draft: AppointmentDraft,
    token: Option<String>,
}

async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    let Ok(mut store) = state.appointments.lock() else {
        return internal::<Appointment>("appointment store lock poisoned");
    };
    let mut buffer = FormStagingBuffer::create_appointment();
    if let Some(draft) = buffer.appointment_mut() {
        *draft = payload.draft;
    }
    match buffer.commit_appointment(&mut store) {
        Ok(created) => Json(ApiResponse::ok(created)).into_response(),
        Err(e) => err_response::<Appointment>(e),
    }
}

#[derive(Deserialize)]
struct UpdateAppointmentRequest {
    #[serde(flatten)]
    draft: AppointmentDraft,
    token: Option<String>,
}

async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    let Ok(mut store) = state.appointments.lock() else {
        return internal::<Appointment>("appointment store lock poisoned");
    };
    let Some(existing) = store.get(id) else {
        return err_response::<Appointment>(AppError::not_found("appointment", id));
    };
    let mut buffer = FormStagingBuffer::edit_appointment(&existing);
    if let Some(draft) = buffer.appointment_mut() {
        *draft = payload.draft;
    }
    match buffer.commit_appointment(&mut store) {
        Ok(updated) => Json(ApiResponse::ok(updated)).into_response(),
        Err(e) => err_response::<Appointment>(e),
    }
}

async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(mut store) = state.appointments.lock() else {
        return internal::<()>("appointment store lock poisoned");
    };
    match store.remove(id) {
        Ok(()) => Json(ApiResponse::ok(())).into_response(),
        Err(e) => err_response::<()>(e),
    }
}

// ============ Prescriptions ============

#[derive(Deserialize)]
struct ListPrescriptionsQuery {
    token: Option<String>,
    search: Option<String>,
}

async fn list_prescriptions(
    State(state): State<AppState>,
    Query(query): Query<ListPrescriptionsQuery>,
) -> Response {
    let auth_query = AuthQuery { token: query.token };
    require_auth!(state, auth_query);

    let Ok(store) = state.prescriptions.lock() else {
        return internal::<Vec<Prescription>>("prescription store lock poisoned");
    };
    let records = store.list();
    let filtered = search::filter(&records, query.search.as_deref().unwrap_or(""), None);
    Json(ApiResponse::ok(filtered)).into_response()
}

/// A prescription annotated with its refill countdown.
#[derive(Serialize)]
struct PrescriptionStatus {
    #[serde(flatten)]
    prescription: Prescription,
    days_until_refill: Option<i64>,
    refill_urgent: bool,
}

async fn active_prescriptions(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(store) = state.prescriptions.lock() else {
        return internal::<Vec<PrescriptionStatus>>("prescription store lock poisoned");
    };
    let today = Local::now().date_naive();
    let active: Vec<PrescriptionStatus> = store
        .list()
        .into_iter()
        .filter(|p| p.end_date.map_or(true, |end| end >= today))
        .map(|prescription| {
            let days_until_refill = prescription
                .refill_date
                .map(|refill| schedule::days_remaining(refill, today));
            let refill_urgent = days_until_refill.is_some_and(schedule::is_urgent);
            PrescriptionStatus {
                prescription,
                days_until_refill,
                refill_urgent,
            }
        })
        .collect();
    Json(ApiResponse::ok(active)).into_response()
}

#[derive(Deserialize)]
struct CreatePrescriptionRequest {
    #[serde(flatten)]
    draft: PrescriptionDraft,
    token: Option<String>,
}

async fn create_prescription(
    State(state): State<AppState>,
    Json(payload): Json<CreatePrescriptionRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    let Ok(mut store) = state.prescriptions.lock() else {
        return internal::<Prescription>("prescription store lock poisoned");
    };
    let mut buffer = FormStagingBuffer::create_prescription();
    if let Some(draft) = buffer.prescription_mut() {
        *draft = payload.draft;
    }
    match buffer.commit_prescription(&mut store) {
        Ok(created) => Json(ApiResponse::ok(created)).into_response(),
        Err(e) => err_response::<Prescription>(e),
    }
}

#[derive(Deserialize)]
struct UpdatePrescriptionRequest {
    #[serde(flatten)]
    draft: PrescriptionDraft,
    token: Option<String>,
}

async fn update_prescription(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdatePrescriptionRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    let Ok(mut store) = state.prescriptions.lock() else {
        return internal::<Prescription>("prescription store lock poisoned");
    };
    let Some(existing) = store.get(id) else {
        return err_response::<Prescription>(AppError::not_found("prescription", id));
    };
    let mut buffer = FormStagingBuffer::edit_prescription(&existing);
    if let Some(draft) = buffer.prescription_mut() {
        *draft = payload.draft;
    }
    match buffer.commit_prescription(&mut store) {
        Ok(updated) => Json(ApiResponse::ok(updated)).into_response(),
        Err(e) => err_response::<Prescription>(e),
    }
}

async fn delete_prescription(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(mut store) = state.prescriptions.lock() else {
        return internal::<()>("prescription store lock poisoned");
    };
    match store.remove(id) {
        Ok(()) => Json(ApiResponse::ok(())).into_response(),
        Err(e) => err_response::<()>(e),
    }
}

// ============ Reminders ============

async fn list_reminders(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(store) = state.reminders.lock() else {
        return internal::<Vec<Reminder>>("reminder store lock poisoned");
    };
    Json(ApiResponse::ok(store.list())).into_response()
}

async fn todays_reminders_handler(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(store) = state.reminders.lock() else {
        return internal::<Vec<Reminder>>("reminder store lock poisoned");
    };
    let today = Local::now().date_naive();
    Json(ApiResponse::ok(schedule::todays_reminders(
        &store.list(),
        today,
    )))
    .into_response()
}

async fn upcoming_reminders_handler(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(store) = state.reminders.lock() else {
        return internal::<Vec<Reminder>>("reminder store lock poisoned");
    };
    let today = Local::now().date_naive();
    Json(ApiResponse::ok(schedule::upcoming_one_time(
        &store.list(),
        today,
    )))
    .into_response()
}

#[derive(Deserialize)]
struct CreateReminderRequest {
    #[serde(flatten)]
    draft: ReminderDraft,
    token: Option<String>,
}

async fn create_reminder(
    State(state): State<AppState>,
    Json(payload): Json<CreateReminderRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    let Ok(mut store) = state.reminders.lock() else {
        return internal::<Reminder>("reminder store lock poisoned");
    };
    let mut buffer = FormStagingBuffer::create_reminder();
    if let Some(draft) = buffer.reminder_mut() {
        *draft = payload.draft;
    }
    match buffer.commit_reminder(&mut store) {
        Ok(created) => Json(ApiResponse::ok(created)).into_response(),
        Err(e) => err_response::<Reminder>(e),
    }
}

#[derive(Deserialize)]
struct UpdateReminderRequest {
    #[serde(flatten)]
    draft: ReminderDraft,
    token: Option<String>,
}

async fn update_reminder(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateReminderRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    let Ok(mut store) = state.reminders.lock() else {
        return internal::<Reminder>("reminder store lock poisoned");
    };
    let Some(existing) = store.get(id) else {
        return err_response::<Reminder>(AppError::not_found("reminder", id));
    };
    let mut buffer = FormStagingBuffer::edit_reminder(&existing);
    if let Some(draft) = buffer.reminder_mut() {
        *draft = payload.draft;
    }
    match buffer.commit_reminder(&mut store) {
        Ok(updated) => Json(ApiResponse::ok(updated)).into_response(),
        Err(e) => err_response::<Reminder>(e),
    }
}

async fn delete_reminder(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(mut store) = state.reminders.lock() else {
        return internal::<()>("reminder store lock poisoned");
    };
    match store.remove(id) {
        Ok(()) => Json(ApiResponse::ok(())).into_response(),
        Err(e) => err_response::<()>(e),
    }
}

// ============ Documents ============

#[derive(Deserialize)]
struct ListDocumentsQuery {
    token: Option<String>,
    search: Option<String>,
    category: Option<String>,
}

async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Response {
    let auth_query = AuthQuery { token: query.token };
    require_auth!(state, auth_query);

    let Ok(store) = state.documents.lock() else {
        return internal::<Vec<Document>>("document store lock poisoned");
    };
    let records = store.list();
    let filtered = search::filter(
        &records,
        query.search.as_deref().unwrap_or(""),
        query.category.as_deref(),
    );
    Json(ApiResponse::ok(filtered)).into_response()
}

#[derive(Deserialize)]
struct StartUploadRequest {
    #[serde(flatten)]
    upload: UploadRequest,
    token: Option<String>,
}

#[derive(Serialize)]
struct StartUploadResponse {
    task_id: u64,
}

async fn start_upload(
    State(state): State<AppState>,
    Json(payload): Json<StartUploadRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    let Ok(mut uploads) = state.uploads.lock() else {
        return internal::<StartUploadResponse>("upload manager lock poisoned");
    };
    let task_id = uploads.start(payload.upload, state.documents.clone());
    Json(ApiResponse::ok(StartUploadResponse { task_id })).into_response()
}

async fn upload_progress(
    State(state): State<AppState>,
    Path(task_id): Path<u64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(uploads) = state.uploads.lock() else {
        return internal::<()>("upload manager lock poisoned");
    };
    match uploads.progress(task_id) {
        Some(progress) => Json(ApiResponse::ok(progress)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::err(format!(
                "upload task {task_id} not found"
            ))),
        )
            .into_response(),
    }
}

async fn cancel_upload(
    State(state): State<AppState>,
    Path(task_id): Path<u64>,
    Query(query): Query<AuthQuery>,
) -> Response {
    require_auth!(state, query);
    let Ok(uploads) = state.uploads.lock() else {
        return internal::<()>("upload manager lock poisoned");
    };
    if uploads.cancel(task_id) {
        Json(ApiResponse::ok(())).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::err(format!(
                "upload task {task_id} not found"
            ))),
        )
            .into_response()
    }
}

// ============ Assistant ============

#[derive(Deserialize)]
struct AssistantRequest {
    message: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct AssistantResponse {
    reply: &'static str,
}

async fn assistant_handler(
    State(state): State<AppState>,
    Json(payload): Json<AssistantRequest>,
) -> Response {
    let auth_query = AuthQuery { token: payload.token };
    require_auth!(state, auth_query);

    Json(ApiResponse::ok(AssistantResponse {
        reply: assistant::reply(&payload.message),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::with_demo_data(Credentials::new("test", "password").unwrap())
            .expect("demo data seeds");
        create_router(state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"username":"test","password":"password"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        json["data"]["token"].as_str().unwrap().to_string()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
        let request = Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn delete(app: &Router, uri: &str) -> Response {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let app = test_app();
        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unauthenticated_list_is_rejected() {
        let app = test_app();
        let response = get(&app, "/api/appointments").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_credentials_are_rejected() {
        let app = test_app();
        let response = post_json(
            &app,
            "/api/auth/login",
            serde_json::json!({"username": "test", "password": "wrong"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_verify_logout_round_trip() {
        let app = test_app();
        let token = login(&app).await;

        let response = get(&app, &format!("/api/auth/verify?token={token}")).await;
        assert_eq!(body_json(response).await["data"], serde_json::json!(true));

        let response = post_json(
            &app,
            &format!("/api/auth/logout?token={token}"),
            serde_json::json!({}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&app, &format!("/api/auth/verify?token={token}")).await;
        assert_eq!(body_json(response).await["data"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn appointment_crud_round_trip() {
        let app = test_app();
        let token = login(&app).await;

        // Demo data holds ids 1..=3, so the next id is 4.
        let response = post_json(
            &app,
            "/api/appointments",
            serde_json::json!({
                "doctor_name": "Dr. Alan Nguyen",
                "specialty": "Neurology",
                "date": "2025-07-01",
                "time": "11:30 AM",
                "location": "Neuro Center",
                "phone_number": null,
                "notes": null,
                "token": token,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["data"]["id"], serde_json::json!(4));

        let response = put_json(
            &app,
            "/api/appointments/4",
            serde_json::json!({
                "doctor_name": "Dr. Alan Nguyen",
                "specialty": "Neurology",
                "date": "2025-07-02",
                "time": "9:00 AM",
                "location": "Neuro Center",
                "phone_number": null,
                "notes": null,
                "token": token,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["data"]["date"], serde_json::json!("2025-07-02"));

        let response = delete(&app, &format!("/api/appointments/4?token={token}")).await;
        assert_eq!(response.status(), StatusCode::OK);

        // Second delete hits a missing id.
        let response = delete(&app, &format!("/api/appointments/4?token={token}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reminder_validation_failure_leaves_store_unchanged() {
        let app = test_app();
        let token = login(&app).await;

        let response = post_json(
            &app,
            "/api/reminders",
            serde_json::json!({
                "title": "",
                "time": "08:00",
                "recurring": false,
                "date": "2025-05-15",
                "token": token,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = get(&app, &format!("/api/reminders?token={token}")).await;
        let listed = body_json(response).await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn todays_reminders_include_the_everyday_one() {
        let app = test_app();
        let token = login(&app).await;

        // "Take Medication" recurs on all seven weekdays, so it is always due.
        let response = get(&app, &format!("/api/reminders/today?token={token}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let titles: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert!(titles.contains(&"Take Medication"));
    }

    #[tokio::test]
    async fn prescription_search_filters_by_name() {
        let app = test_app();
        let token = login(&app).await;

        let response = get(
            &app,
            &format!("/api/prescriptions?token={token}&search=lisinopril"),
        )
        .await;
        let json = body_json(response).await;
        let names: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Lisinopril"]);
    }

    #[tokio::test]
    async fn document_category_filter_composes_with_search() {
        let app = test_app();
        let token = login(&app).await;

        let response = get(
            &app,
            &format!("/api/documents?token={token}&category=Lab%20Results"),
        )
        .await;
        let json = body_json(response).await;
        let titles: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Blood Test Results"]);
    }

    #[tokio::test]
    async fn assistant_matches_symptom_keywords() {
        let app = test_app();
        let token = login(&app).await;

        let response = post_json(
            &app,
            "/api/assistant",
            serde_json::json!({"message": "I keep getting a headache", "token": token}),
        )
        .await;
        let json = body_json(response).await;
        let reply = json["data"]["reply"].as_str().unwrap();
        assert!(reply.contains("Headaches"));
    }

    #[tokio::test]
    async fn upload_task_can_be_started_and_cancelled() {
        let app = test_app();
        let token = login(&app).await;

        let response = post_json(
            &app,
            "/api/documents/upload",
            serde_json::json!({
                "file_name": "mri_scan.dicom",
                "file_size_bytes": 12_700_000u64,
                "token": token,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let task_id = body_json(response).await["data"]["task_id"].as_u64().unwrap();

        let response = get(
            &app,
            &format!("/api/documents/upload/{task_id}?token={token}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = delete(
            &app,
            &format!("/api/documents/upload/{task_id}?token={token}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = delete(&app, &format!("/api/documents/upload/999?token={token}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
