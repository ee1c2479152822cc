pub mod assets;
pub mod dashboard;
pub mod events;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(dashboard::config)
        .configure(assets::config)
        .service(
            web::scope("/api/v1")
                .configure(health::config)
                .configure(events::config)
        );
}
