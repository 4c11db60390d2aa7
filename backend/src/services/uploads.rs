//! Serves stored certificate images under `/uploads/{file}`.

use crate::store::{UploadDir, UPLOADS_ROUTE};
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};
use log::error;
use mime_guess::from_path;

pub fn configure_routes() -> Scope {
    scope(UPLOADS_ROUTE).route("/{file}", get().to(process))
}

async fn process(file: web::Path<String>, uploads: web::Data<UploadDir>) -> HttpResponse {
    let name = file.into_inner();
    let Some(path) = uploads.resolve(&name) else {
        return HttpResponse::NotFound().body("Not Found");
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = from_path(&path).first_or_octet_stream();
            HttpResponse::Ok().content_type(mime.as_ref()).body(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            HttpResponse::NotFound().body("Not Found")
        }
        Err(e) => {
            error!("Failed to read upload {}: {}", name, e);
            HttpResponse::InternalServerError().body("Failed to read upload")
        }
    }
}
