use actix_web::web;

use crate::{
    entities::{blog_post::BlogPost, project::Project, resource::Resource, skill::Skill},
    handlers::resources,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/resources")
            .configure(resource_routes::<Project>)
            .configure(resource_routes::<BlogPost>)
            .configure(resource_routes::<Skill>)
    );
}

fn resource_routes<R: Resource>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("/{}", R::PATH))
            .route(web::get().to(resources::list_resources::<R>))
            .route(web::post().to(resources::create_resource::<R>))
    )
    .service(
        web::resource(format!("/{}/{{id}}", R::PATH))
            .route(web::put().to(resources::update_resource::<R>))
            .route(web::patch().to(resources::update_resource::<R>))
            .route(web::delete().to(resources::delete_resource::<R>))
    );
}
