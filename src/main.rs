use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod handlers;

use bet_tracker::schedule::ScheduleClient;
use bet_tracker::{AppConfig, AuthGate, BetStore};
use handlers::{bets, dashboard, health, schedule, session};

/// Application state shared across handlers
pub struct AppState {
    pub config: AppConfig,
    pub store: BetStore,
    pub auth: AuthGate,
    pub schedule: Option<ScheduleClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let schedule = match ScheduleClient::new(config.schedule.clone()) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Failed to create schedule client: {}. Schedule disabled.", e);
                None
            }
        };

        Self {
            store: BetStore::new(&config.storage.data_file),
            auth: AuthGate::from_config(&config),
            schedule,
            config,
        }
    }
}

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/bets", web::get().to(bets::list_bets))
        .route("/bets", web::post().to(bets::add_bet))
        .route("/bets/{index}/result", web::put().to(bets::settle_bet))
        .route("/dashboard", web::get().to(dashboard::get_dashboard))
        .route("/schedule", web::get().to(schedule::get_schedule))
        .route("/session", web::get().to(session::session_status))
        .route("/login", web::post().to(session::login))
        .route("/logout", web::post().to(session::logout));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load_from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    config.log();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app_state = Arc::new(AppState::new(config));

    let bets = app_state.store.load_or_empty();
    info!("Ledger has {} bets", bets.len());

    info!("Starting Bet Tracker API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&addr)?
    .run()
    .await
}
