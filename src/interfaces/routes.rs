use actix_web::web;

use crate::{constants::API_PREFIX, handlers::home::home};

mod contact;
mod json_error;
mod resources;
mod system;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope(API_PREFIX)
            .configure(resources::config_routes)
            .configure(contact::config_routes)
            .configure(system::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
