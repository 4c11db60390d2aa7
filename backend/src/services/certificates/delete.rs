use crate::store::CertificateStore;
use actix_web::{web, HttpResponse, Responder};
use log::error;

pub(crate) async fn process(
    id: web::Path<String>,
    store: web::Data<CertificateStore>,
) -> impl Responder {
    match store.delete(&id.into_inner()) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().body("Certificate not found"),
        Err(e) => {
            error!("Delete certificate error: {}", e);
            HttpResponse::InternalServerError().body("Failed to delete certificate")
        }
    }
}
