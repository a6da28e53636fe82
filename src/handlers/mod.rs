pub mod bets;
pub mod dashboard;
pub mod health;
pub mod schedule;
pub mod session;

use actix_web::HttpRequest;
use bet_tracker::auth::SESSION_COOKIE;
use bet_tracker::error::AppError;
use chrono::Utc;

use crate::AppState;

/// Reject the request unless it carries a valid edit session
pub fn require_edit(req: &HttpRequest, state: &AppState) -> Result<(), AppError> {
    let allowed = req
        .cookie(SESSION_COOKIE)
        .map(|c| state.auth.verify_token(c.value(), Utc::now()))
        .unwrap_or(false);

    if allowed {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}
