mod admin;
mod config;
mod doctor;
mod models;
mod password;
mod protocol;
mod schedule;
mod session;
mod supabase;
mod utils;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{
    dev::{fn_service, ServiceRequest, ServiceResponse},
    get,
    http::header,
    middleware::Logger,
    web, App, HttpResponse, HttpServer, Responder,
};
use tracing_subscriber::EnvFilter;

use crate::supabase::SupabaseClient;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

/// Serves the built frontend, falling back to `index.html` for client-side routes.
fn frontend(dir: &str) -> Files {
    let index = std::path::Path::new(dir).join("index.html");
    Files::new("/", dir)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(index).await?;
                let res = file.into_response(&req);
                Ok(ServiceResponse::new(req, res))
            }
        }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let client = web::Data::new(SupabaseClient::from_config(&config));
    let bind = config.bind.clone();
    tracing::info!(%bind, supabase = %config.supabase_url, "server starting");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.cors_origin)
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .max_age(3600);

        let mut app = App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(client.clone())
            .app_data(protocol::json_config())
            .app_data(protocol::query_config())
            .service(health)
            // doctor lifecycle
            .configure(admin::lifecycle_config)
            .configure(doctor::public_config)
            // session
            .service(web::scope("/auth").configure(session::config))
            // administrator
            .service(web::scope("/admin").configure(admin::config))
            // doctor
            .service(web::scope("/doctor").configure(doctor::config));
        if let Some(dir) = &config.static_dir {
            app = app.service(frontend(dir));
        }
        app
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
