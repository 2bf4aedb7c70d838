//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::io;
use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use user_directory::Trace;
#[cfg(debug_assertions)]
use user_directory::ApiDoc;
use user_directory::domain::UserDirectoryService;
use user_directory::inbound::http::assets::{PublicAssets, serve_asset};
use user_directory::inbound::http::error::json_config;
use user_directory::inbound::http::state::HttpState;
use user_directory::inbound::http::users;
use user_directory::outbound::persistence::{DbPool, DieselUserRepository};

/// Wire the API, the asset fallback and the middleware around `http_state`.
pub(crate) fn build_app(
    http_state: web::Data<HttpState>,
    assets: web::Data<PublicAssets>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .app_data(assets)
        .app_data(json_config())
        .wrap(NormalizePath::new(TrailingSlash::Trim))
        .wrap(Trace)
        .service(web::scope("/api").configure(users::configure));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(serve_asset))
}

/// Construct the HTTP server over the database pool.
///
/// # Errors
/// Propagates [`std::io::Error`] when the public root cannot be opened or the
/// socket cannot be bound.
pub fn create_server(config: &ServerConfig, pool: DbPool) -> io::Result<Server> {
    let repository = Arc::new(DieselUserRepository::new(pool));
    let http_state = web::Data::new(HttpState::new(Arc::new(UserDirectoryService::new(
        repository,
    ))));
    let assets = web::Data::new(PublicAssets::open(&config.public_dir).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!(
                "failed to open public root {}: {err}",
                config.public_dir.display()
            ),
        )
    })?);

    info!(
        bind_addr = %config.bind_addr,
        public_dir = %config.public_dir.display(),
        "starting user directory server"
    );
    let server = HttpServer::new(move || build_app(http_state.clone(), assets.clone()))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}
