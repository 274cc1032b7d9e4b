//! Login, logout and session introspection.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::db::{queries, Database};
use crate::error::ApiError;
use crate::session::{self, SessionManager, SESSION_COOKIE};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Verify credentials against the stored argon2 hash and issue the session
/// cookie. Unknown users and wrong passwords are indistinguishable to the
/// caller.
pub async fn login(
    db: web::Data<Database>,
    sessions: web::Data<SessionManager>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".into(),
        ));
    }

    let user = queries::fetch_user(db.pool(), username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !session::verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = sessions.issue(&user.username, &user.role)?;
    info!(username = %user.username, "user logged in");

    Ok(HttpResponse::Ok()
        .cookie(sessions.login_cookie(token))
        .json(json!({
            "success": true,
            "username": user.username,
            "role": user.role,
        })))
}

/// Invalidate the session by expiring its cookie.
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(SessionManager::logout_cookie())
        .json(json!({ "success": true }))
}

/// Report the current session state; never errors, a missing or invalid
/// cookie just reads as logged out.
pub async fn session(req: HttpRequest, sessions: web::Data<SessionManager>) -> HttpResponse {
    let claims = req
        .cookie(SESSION_COOKIE)
        .and_then(|cookie| sessions.verify(cookie.value()).ok());

    match claims {
        Some(claims) => HttpResponse::Ok().json(json!({
            "is_logged_in": true,
            "username": claims.sub,
            "role": claims.role,
        })),
        None => HttpResponse::Ok().json(json!({
            "is_logged_in": false,
            "username": null,
        })),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::Value;

    use super::*;
    use crate::config::SessionConfig;

    fn manager() -> SessionManager {
        SessionManager::new(&SessionConfig {
            secret: "test-secret-key-that-is-long-enough".into(),
            ttl_days: 7,
            cookie_secure: false,
        })
    }

    #[actix_rt::test]
    async fn session_reports_logged_out_without_cookie() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(manager()))
                .route("/api/auth/session", web::get().to(session)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/auth/session").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["is_logged_in"], Value::Bool(false));
        assert_eq!(body["username"], Value::Null);
    }

    #[actix_rt::test]
    async fn session_reports_logged_in_with_valid_cookie() {
        let sessions = manager();
        let token = sessions.issue("admin", "admin").unwrap();
        let cookie = sessions.login_cookie(token);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(sessions))
                .route("/api/auth/session", web::get().to(session)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/auth/session")
            .cookie(cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["is_logged_in"], Value::Bool(true));
        assert_eq!(body["username"], "admin");
        assert_eq!(body["role"], "admin");
    }

    #[actix_rt::test]
    async fn logout_clears_the_session_cookie() {
        let app =
            test::init_service(App::new().route("/api/auth/logout", web::post().to(logout)))
                .await;

        let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("logout must reset the session cookie");
        assert_eq!(cookie.value(), "");
    }
}
