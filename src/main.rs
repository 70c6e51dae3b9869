use healthmate::auth::Credentials;
use healthmate::scheduler;
use healthmate::server::{self, AppState};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port = std::env::var("HEALTHMATE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let credentials = match Credentials::new("test", "password") {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to prepare credentials: {}", e);
            std::process::exit(1);
        }
    };

    let state = match AppState::with_demo_data(credentials) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to seed demo data: {}", e);
            std::process::exit(1);
        }
    };

    tokio::spawn(scheduler::run_scheduler(state.reminders.clone()));

    if let Err(e) = server::start_server(port, state).await {
        log::error!("Server exited with error: {}", e);
        std::process::exit(1);
    }
}
