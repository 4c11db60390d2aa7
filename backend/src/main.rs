mod config;
mod services;
mod store;

use crate::config::Config;
use crate::store::{CertificateStore, UploadDir};
use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::parse();

    let store = CertificateStore::open(&config.database).map_err(io::Error::other)?;
    let uploads = UploadDir::new(&config.uploads)?;
    info!(
        "Using database {} and uploads in {}",
        config.database.display(),
        config.uploads.display()
    );

    let store = web::Data::new(store);
    let uploads = web::Data::new(uploads);

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(uploads.clone())
            .service(services::certificates::configure_routes())
            .service(services::uploads::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
