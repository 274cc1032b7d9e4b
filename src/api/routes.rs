//! Route table.

use actix_web::web;

use super::handlers::{self, auth, dashboard, patients, readings};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/session", web::get().to(auth::session)),
            )
            .service(
                web::scope("/patients")
                    .route("", web::get().to(patients::list))
                    .route("/board", web::get().to(patients::board))
                    .route("/search", web::get().to(patients::search))
                    .route(
                        "/{patient_id}/wearable",
                        web::post().to(patients::assign_wearable),
                    ),
            )
            .service(
                web::scope("/wearables")
                    .route("/latest", web::get().to(readings::latest))
                    .route("/{wearable_id}/readings", web::post().to(readings::record))
                    .route("/{wearable_id}/readings", web::get().to(readings::list)),
            )
            .route("/dashboard", web::get().to(dashboard::summary)),
    )
    .route("/health", web::get().to(handlers::health));
}
