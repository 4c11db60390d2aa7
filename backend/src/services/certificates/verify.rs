use crate::store::CertificateStore;
use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;

/// Public lookup of a certificate by its number.
pub(crate) async fn process(
    number: web::Path<String>,
    store: web::Data<CertificateStore>,
) -> impl Responder {
    let number = number.into_inner();
    match store.find_by_number(number.trim()) {
        Ok(Some(certificate)) => HttpResponse::Ok().json(certificate),
        Ok(None) => {
            info!("Verification miss for certificate {}", number);
            HttpResponse::NotFound().json(json!({ "error": "Certificate not found" }))
        }
        Err(e) => {
            error!("Certificate verification error: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Verification failed" }))
        }
    }
}
