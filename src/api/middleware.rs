//! Session extraction.
//!
//! Handlers that require a logged-in staff member take a `SessionUser`
//! parameter; extraction fails with 401 when the cookie is absent or its
//! token does not verify.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::error::ApiError;
use crate::session::{SessionClaims, SessionManager, SESSION_COOKIE};

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct SessionUser(pub SessionClaims);

impl FromRequest for SessionUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<SessionUser, ApiError> {
    let sessions = req
        .app_data::<web::Data<SessionManager>>()
        .ok_or(ApiError::Unauthorized)?;
    let cookie = req.cookie(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;
    let claims = sessions.verify(cookie.value())?;
    Ok(SessionUser(claims))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    use super::*;
    use crate::config::SessionConfig;

    async fn probe(user: SessionUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.sub)
    }

    fn manager() -> SessionManager {
        SessionManager::new(&SessionConfig {
            secret: "test-secret-key-that-is-long-enough".into(),
            ttl_days: 7,
            cookie_secure: false,
        })
    }

    #[actix_rt::test]
    async fn request_without_cookie_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(manager()))
                .route("/probe", web::get().to(probe)),
        )
        .await;

        let req = test::TestRequest::get().uri("/probe").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn request_with_valid_cookie_extracts_claims() {
        let sessions = manager();
        let token = sessions.issue("enfermero1", "nurse").unwrap();
        let cookie = sessions.login_cookie(token);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(sessions))
                .route("/probe", web::get().to(probe)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/probe")
            .cookie(cookie)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "enfermero1");
    }

    #[actix_rt::test]
    async fn request_with_tampered_cookie_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(manager()))
                .route("/probe", web::get().to(probe)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/probe")
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "tampered"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
