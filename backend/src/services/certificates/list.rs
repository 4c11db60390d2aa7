use crate::store::CertificateStore;
use actix_web::{web, HttpResponse, Responder};
use log::error;

pub(crate) async fn process(store: web::Data<CertificateStore>) -> impl Responder {
    match store.list() {
        Ok(certificates) => HttpResponse::Ok().json(certificates),
        Err(e) => {
            error!("Get certificates error: {}", e);
            HttpResponse::InternalServerError().body("Failed to get certificates")
        }
    }
}
