use actix_web::web;

use crate::{handlers::{projects, secrets}, repositories::project::ProjectRepository};

pub fn config_routes<R: ProjectRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::get().to(projects::list_projects::<R>))
                    .route(web::post().to(projects::create_project::<R>))
            )
            .service(
                web::resource("/image/{file_name}")
                    .route(web::get().to(projects::serve_image::<R>))
            )
            .service(
                web::resource("/secrets/{key}")
                    .route(web::get().to(secrets::get_secret::<R>))
            )
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(projects::get_project::<R>))
                    .route(web::put().to(projects::update_project::<R>))
                    .route(web::delete().to(projects::delete_project::<R>))
            )
    );
}
