use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::AppState;
use bet_tracker::Dashboard;

/// Summary, profit shares, bankroll series, metrics and history
pub async fn get_dashboard(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let bets = state.store.load_or_empty();
    let dashboard = Dashboard::build(&bets, &state.config.participants);

    HttpResponse::Ok().json(dashboard)
}
