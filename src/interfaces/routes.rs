use actix_web::web;

use crate::{handlers::system, repositories::project::ProjectRepository};

mod projects;

/// Registers every route; project endpoints live under `/api`.
pub fn configure_routes<R: ProjectRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(system::home));
    cfg.route("/health", web::get().to(system::health_check::<R>));

    cfg.service(
        web::scope("/api")
            .configure(projects::config_routes::<R>)
    );
}

