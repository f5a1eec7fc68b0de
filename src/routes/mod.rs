// Route exports
pub mod dating;

use actix_web::web;

pub use dating::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(dating::health_check))
        .service(web::scope("/api/v1").configure(dating::configure));
}
