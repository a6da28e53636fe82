use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::AppState;
use bet_tracker::auth::SESSION_COOKIE;
use bet_tracker::models::{LoginRequest, LoginResponse};

fn session_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// Exchange the shared password for a signed edit session
pub async fn login(state: web::Data<Arc<AppState>>, body: web::Json<LoginRequest>) -> HttpResponse {
    if !state.auth.check_password(&body.password) {
        return HttpResponse::Unauthorized().json(LoginResponse {
            edit_allowed: false,
        });
    }

    info!("Edit session granted");
    let token = state.auth.issue_token(Utc::now());

    HttpResponse::Ok()
        .cookie(session_cookie(token, state.auth.ttl_secs()))
        .json(LoginResponse { edit_allowed: true })
}

/// Drop the edit session
pub async fn logout() -> HttpResponse {
    let mut cookie = session_cookie(String::new(), 0);
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        edit_allowed: false,
    })
}

/// Whether the caller may edit
pub async fn session_status(req: HttpRequest, state: web::Data<Arc<AppState>>) -> HttpResponse {
    let edit_allowed = super::require_edit(&req, &state).is_ok();
    HttpResponse::Ok().json(LoginResponse { edit_allowed })
}
