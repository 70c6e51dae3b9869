//! Background reminder scheduler.
//!
//! Checks once a minute which reminders fall due at the current local time and
//! logs them. Actual notification delivery is out of scope; the log line is
//! the delivery.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

use crate::models::Reminder;
use crate::schedule;
use crate::store::EntityStore;

pub struct ReminderScheduler {
    reminders: Arc<Mutex<EntityStore<Reminder>>>,
    is_running: Arc<RwLock<bool>>,
}

impl ReminderScheduler {
    pub fn new(reminders: Arc<Mutex<EntityStore<Reminder>>>) -> Self {
        Self {
            reminders,
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub async fn start(&self) {
        *self.is_running.write().await = true;
        log::info!("[scheduler] started");
    }

    pub async fn stop(&self) {
        *self.is_running.write().await = false;
        log::info!("[scheduler] stopped");
    }

    /// Logs every reminder due at the current local minute.
    pub fn check_due_reminders(&self) {
        let now = Local::now();
        let today = now.date_naive();
        let current_time = now.format("%H:%M").to_string();

        let snapshot = match self.reminders.lock() {
            Ok(store) => store.list(),
            Err(e) => {
                log::error!("[scheduler] reminder store unavailable: {}", e);
                return;
            }
        };

        for reminder in due_at(&snapshot, today, &current_time) {
            match &reminder.description {
                Some(desc) => log::info!("Reminder due: {} ({})", reminder.title, desc),
                None => log::info!("Reminder due: {}", reminder.title),
            }
        }
    }
}

/// Reminders occurring on `today` whose time matches `current_time` exactly.
fn due_at(reminders: &[Reminder], today: NaiveDate, current_time: &str) -> Vec<Reminder> {
    schedule::todays_reminders(reminders, today)
        .into_iter()
        .filter(|r| r.time == current_time)
        .collect()
}

/// Runs the scheduler until it is stopped. Spawned at startup.
pub async fn run_scheduler(reminders: Arc<Mutex<EntityStore<Reminder>>>) {
    let scheduler = ReminderScheduler::new(reminders);
    scheduler.start().await;

    let mut ticker = interval(Duration::from_secs(60));
    loop {
        ticker.tick().await;
        if !scheduler.is_running().await {
            log::info!("[scheduler] stop signal received, exiting");
            break;
        }
        scheduler.check_due_reminders();
    }
}
