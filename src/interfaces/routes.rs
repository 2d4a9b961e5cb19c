use actix_web::web;

use crate::constants::API_PREFIX;
use crate::handlers::{home::home, system::health_check};

mod auth;
mod companies;
mod experiences;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope(API_PREFIX)
            .configure(auth::config_routes)
            .configure(companies::config_routes)
            .configure(experiences::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
