//! Simulated document uploads.
//!
//! No real file transfer happens; an upload is a background task that advances
//! a progress figure on a timer and files the document's metadata when it
//! finishes. Every task is cancellable and ends in an explicit terminal state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::time::{interval, Duration};

use crate::models::{Document, DocumentCategory, DocumentDraft};
use crate::store::EntityStore;

const TICK: Duration = Duration::from_millis(300);
const TICKS_TO_COMPLETE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadProgress {
    pub percent: u8,
    pub state: UploadState,
    /// Id of the filed document once the upload completes.
    pub document_id: Option<u64>,
}

/// What the caller submits to start an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub file_size_bytes: u64,
}

struct UploadHandle {
    progress: Arc<RwLock<UploadProgress>>,
    cancelled: Arc<RwLock<bool>>,
}

/// Tracks running and finished upload tasks.
pub struct UploadManager {
    tasks: HashMap<u64, UploadHandle>,
    next_task_id: u64,
}

impl UploadManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            next_task_id: 1,
        }
    }

    /// Spawns a simulated upload and returns its task id.
    pub fn start(
        &mut self,
        request: UploadRequest,
        documents: Arc<Mutex<EntityStore<Document>>>,
    ) -> u64 {
        self.start_with_tick(request, documents, TICK)
    }

    /// As [`start`](Self::start), with a caller-chosen tick interval.
    pub fn start_with_tick(
        &mut self,
        request: UploadRequest,
        documents: Arc<Mutex<EntityStore<Document>>>,
        tick: Duration,
    ) -> u64 {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let progress = Arc::new(RwLock::new(UploadProgress {
            percent: 0,
            state: UploadState::InProgress,
            document_id: None,
        }));
        let cancelled = Arc::new(RwLock::new(false));

        self.tasks.insert(
            task_id,
            UploadHandle {
                progress: progress.clone(),
                cancelled: cancelled.clone(),
            },
        );

        tokio::spawn(run_upload(request, documents, progress, cancelled, tick));
        log::info!("Upload task {} started", task_id);
        task_id
    }

    /// Current progress of a task, if it exists.
    pub fn progress(&self, task_id: u64) -> Option<UploadProgress> {
        let handle = self.tasks.get(&task_id)?;
        handle.progress.read().ok().map(|p| p.clone())
    }

    /// Requests cancellation. Returns false for an unknown task; cancelling a
    /// finished task has no effect.
    pub fn cancel(&self, task_id: u64) -> bool {
        match self.tasks.get(&task_id) {
            Some(handle) => {
                if let Ok(mut cancelled) = handle.cancelled.write() {
                    *cancelled = true;
                }
                log::info!("Upload task {} cancellation requested", task_id);
                true
            }
            None => false,
        }
    }
}

impl Default for UploadManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_upload(
    request: UploadRequest,
    documents: Arc<Mutex<EntityStore<Document>>>,
    progress: Arc<RwLock<UploadProgress>>,
    cancelled: Arc<RwLock<bool>>,
    tick: Duration,
) {
    let mut ticker = interval(tick);
    ticker.tick().await; // first tick is immediate

    for elapsed in 1..=TICKS_TO_COMPLETE {
        ticker.tick().await;

        if cancelled.read().map(|c| *c).unwrap_or(false) {
            if let Ok(mut p) = progress.write() {
                p.state = UploadState::Cancelled;
                log::info!("Upload of {} cancelled at {}%", request.file_name, p.percent);
            }
            return;
        }

        let Ok(mut p) = progress.write() else { return };
        if elapsed < TICKS_TO_COMPLETE {
            // Creep toward 95% while "transferring"; only the final tick completes.
            let step = {
                use rand::Rng;
                rand::thread_rng().gen_range(5..12)
            };
            p.percent = (p.percent + step).min(95);
        } else {
            p.percent = 100;
            p.state = UploadState::Completed;
            p.document_id = file_document(&request, &documents);
        }
    }
}

/// Files the uploaded document's metadata and returns its id.
fn file_document(
    request: &UploadRequest,
    documents: &Arc<Mutex<EntityStore<Document>>>,
) -> Option<u64> {
    let draft = draft_from_request(request);
    let mut store = documents.lock().ok()?;
    match store.create(draft) {
        Ok(doc) => {
            log::info!("Upload of {} filed as document {}", request.file_name, doc.id);
            Some(doc.id)
        }
        Err(e) => {
            log::error!("Failed to file uploaded document: {}", e);
            None
        }
    }
}

fn draft_from_request(request: &UploadRequest) -> DocumentDraft {
    let (title, extension) = match request.file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), ext.to_uppercase()),
        None => (request.file_name.clone(), String::new()),
    };
    let megabytes = request.file_size_bytes as f64 / (1024.0 * 1024.0);
    DocumentDraft {
        title,
        date: Some(Local::now().date_naive()),
        category: Some(DocumentCategory::MedicalReports),
        file_size: format!("{:.1} MB", megabytes),
        file_type: extension,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> UploadRequest {
        UploadRequest {
            file_name: name.to_string(),
            file_size_bytes: 1_258_291, // ~1.2 MB
        }
    }

    #[test]
    fn draft_derives_title_type_and_size_from_the_file() {
        let draft = draft_from_request(&request("blood_test_results.pdf"));
        assert_eq!(draft.title, "blood_test_results");
        assert_eq!(draft.file_type, "PDF");
        assert_eq!(draft.file_size, "1.2 MB");
        assert_eq!(draft.category, Some(DocumentCategory::MedicalReports));
    }

    #[tokio::test]
    async fn upload_completes_and_files_the_document() {
        let documents = Arc::new(Mutex::new(EntityStore::new()));
        let mut manager = UploadManager::new();
        let task = manager.start_with_tick(
            request("scan.pdf"),
            documents.clone(),
            Duration::from_millis(1),
        );

        let mut last = manager.progress(task).unwrap();
        for _ in 0..200 {
            tokio::time::sleep(Duration::from_millis(2)).await;
            last = manager.progress(task).unwrap();
            if last.state == UploadState::Completed {
                break;
            }
        }

        assert_eq!(last.state, UploadState::Completed);
        assert_eq!(last.percent, 100);
        let doc_id = last.document_id.expect("completed upload files a document");
        let filed = documents.lock().unwrap().get(doc_id).unwrap();
        assert_eq!(filed.title, "scan");
    }

    #[tokio::test]
    async fn cancelled_upload_reaches_a_terminal_state_without_filing() {
        let documents: Arc<Mutex<EntityStore<Document>>> = Arc::new(Mutex::new(EntityStore::new()));
        let mut manager = UploadManager::new();
        let task = manager.start_with_tick(
            request("huge_mri.dicom"),
            documents.clone(),
            Duration::from_millis(20),
        );

        assert!(manager.cancel(task));

        let mut last = manager.progress(task).unwrap();
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            last = manager.progress(task).unwrap();
            if last.state == UploadState::Cancelled {
                break;
            }
        }

        assert_eq!(last.state, UploadState::Cancelled);
        assert!(last.document_id.is_none());
        assert!(documents.lock().unwrap().list().is_empty());
    }

    #[tokio::test]
    async fn cancelling_an_unknown_task_reports_false() {
        let manager = UploadManager::new();
        assert!(!manager.cancel(99));
        assert!(manager.progress(99).is_none());
    }
}
