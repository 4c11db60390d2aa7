use crate::store::CertificateStore;
use actix_web::{web, HttpResponse, Responder};
use log::{error, warn};

/// Removes every certificate. Bulk uploads call this before recreating their batch.
pub(crate) async fn process(store: web::Data<CertificateStore>) -> impl Responder {
    match store.clear() {
        Ok(removed) => {
            warn!("Cleared all certificates ({} removed)", removed);
            HttpResponse::Ok().finish()
        }
        Err(e) => {
            error!("Clear certificates error: {}", e);
            HttpResponse::InternalServerError().body("Failed to clear certificates")
        }
    }
}
