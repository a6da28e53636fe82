use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::info;

use super::require_edit;
use crate::AppState;
use bet_tracker::dashboard::history;
use bet_tracker::error::AppError;
use bet_tracker::models::{NewBet, SettleRequest};

/// Bet history, newest first
pub async fn list_bets(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let bets = state.store.load_or_empty();
    HttpResponse::Ok().json(history(&bets))
}

/// Log a new bet
pub async fn add_bet(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    body: web::Json<NewBet>,
) -> Result<HttpResponse, AppError> {
    require_edit(&req, &state)?;

    let bet = state.store.append(body.into_inner())?;
    info!(
        "Bet saved: {} {:+} for {:.2} ({})",
        bet.game, bet.odds, bet.amount, bet.result
    );

    Ok(HttpResponse::Created().json(bet))
}

/// Set (or correct) a bet's result
pub async fn settle_bet(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    path: web::Path<usize>,
    body: web::Json<SettleRequest>,
) -> Result<HttpResponse, AppError> {
    require_edit(&req, &state)?;

    let bet = state.store.update_result(path.into_inner(), body.result)?;

    Ok(HttpResponse::Ok().json(bet))
}
