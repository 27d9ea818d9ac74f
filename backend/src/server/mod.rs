//! Server construction and middleware wiring.

mod config;
mod store;

pub use config::ServerConfig;
pub use store::build_table_store;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use state_backend::Trace;
#[cfg(debug_assertions)]
use state_backend::doc::ApiDoc;
use state_backend::domain::{Dispatcher, StoreLock};
use state_backend::inbound::http::{
    HealthState, HttpState, dispatch, live, preflight, ready, running,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    max_body_bytes: usize,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        max_body_bytes,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::PayloadConfig::new(max_body_bytes))
        .wrap(Trace)
        .service(dispatch)
        .service(preflight)
        .service(running)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

fn build_dependencies(config: &ServerConfig) -> AppDependencies {
    let dispatcher = Dispatcher::new(
        Arc::clone(&config.store),
        StoreLock::new(config.lock_timeout),
    );
    AppDependencies {
        health_state: web::Data::new(HealthState::new(Arc::clone(&config.store))),
        http_state: web::Data::new(
            HttpState::new(Arc::new(dispatcher)).with_error_status(config.error_status),
        ),
        max_body_bytes: config.max_body_bytes,
    }
}

/// Construct an Actix HTTP server from `config`.
///
/// Every worker shares one dispatcher, so the store lock is process-wide.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let deps = build_dependencies(&config);
    let health_state = deps.health_state.clone();

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
