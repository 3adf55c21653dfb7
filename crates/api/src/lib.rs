mod error;
mod event;
mod job_schedulers;
mod push;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use aurora_fest_infra::FestContext;
use error::FestError;
use job_schedulers::start_reminder_sweep_job;
use std::net::TcpListener;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    event::configure_routes(cfg);
    push::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

/// Malformed bodies, paths, queries and forms are reported like every other
/// invalid input
fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|e, _| FestError::BadClientData(e.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|e, _| FestError::BadClientData(e.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|e, _| FestError::BadClientData(e.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|e, _| FestError::BadClientData(e.to_string()).into()),
    );
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: FestContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: FestContext) {
        if context.config.run_internal_sweeper {
            info!("Starting the in-process reminder sweep job");
            start_reminder_sweep_job(context);
        }
    }

    async fn configure_server(context: FestContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .configure(configure_extractors)
                .service(web::scope("/api").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
