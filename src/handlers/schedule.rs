use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::AppState;
use bet_tracker::schedule::TeamSchedule;

/// Recent and upcoming games; empty with a warning when the feed fails
pub async fn get_schedule(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let schedule = match state.schedule {
        Some(ref client) => client.fetch_schedule_or_empty().await,
        None => TeamSchedule::empty("Schedule client unavailable"),
    };

    HttpResponse::Ok().json(schedule)
}
