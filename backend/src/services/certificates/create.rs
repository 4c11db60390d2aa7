use crate::store::{CertificateStore, StoreError, UploadDir};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::certificate::Certificate;
use common::requests::{fields, CertificateForm};
use futures_util::StreamExt;
use log::{error, info};
use std::collections::HashMap;
use thiserror::Error;

const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
const MAX_TEXT_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
enum CreateError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Only image files are allowed")]
    NotAnImage,
    #[error("File exceeds the 10 MB limit")]
    TooLarge,
    #[error("Malformed upload: {0}")]
    Multipart(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// HTTP handler wrapper that converts the internal result to an `HttpResponse`.
///
/// - On success: `201 Created` with the stored certificate as JSON.
/// - On a client error: `400` (or `413` for an oversized file) with a plain-text reason.
/// - On a storage failure: `500`, the cause is logged.
pub(crate) async fn process(
    store: web::Data<CertificateStore>,
    uploads: web::Data<UploadDir>,
    payload: Multipart,
) -> impl Responder {
    match create_certificate(&store, &uploads, payload).await {
        Ok(certificate) => {
            info!("Published certificate {}", certificate.certificate_number);
            HttpResponse::Created().json(certificate)
        }
        Err(
            e @ (CreateError::MissingField(_)
            | CreateError::NotAnImage
            | CreateError::Multipart(_)
            | CreateError::Store(StoreError::Duplicate)),
        ) => HttpResponse::BadRequest().body(e.to_string()),
        Err(e @ CreateError::TooLarge) => HttpResponse::PayloadTooLarge().body(e.to_string()),
        Err(e) => {
            error!("Create certificate error: {}", e);
            HttpResponse::InternalServerError().body("Failed to create certificate")
        }
    }
}

struct ReceivedForm {
    text: HashMap<String, String>,
    file: Option<Vec<u8>>,
}

/// Collects the multipart fields. The `file` part is kept as raw bytes; every
/// other named part must be UTF-8 text.
async fn read_form(mut payload: Multipart) -> Result<ReceivedForm, CreateError> {
    let mut received = ReceivedForm {
        text: HashMap::new(),
        file: None,
    };

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| CreateError::Multipart(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        let is_file = name.as_deref() == Some(fields::FILE);
        let limit = if is_file { MAX_FILE_BYTES } else { MAX_TEXT_BYTES };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| CreateError::Multipart(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(if is_file {
                    CreateError::TooLarge
                } else {
                    CreateError::Multipart(format!("field {:?} is too large", name))
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        match name {
            Some(_) if is_file => {
                if !bytes.is_empty() {
                    received.file = Some(bytes);
                }
            }
            Some(name) => {
                let value = String::from_utf8(bytes).map_err(|_| {
                    CreateError::Multipart(format!("field {} is not valid UTF-8", name))
                })?;
                received.text.insert(name, value);
            }
            None => {}
        }
    }

    Ok(received)
}

/// Validates the form, stores the optional image and inserts the certificate.
///
/// The duplicate check runs before the image is written so a rejected request
/// leaves nothing behind.
async fn create_certificate(
    store: &CertificateStore,
    uploads: &UploadDir,
    payload: Multipart,
) -> Result<Certificate, CreateError> {
    let received = read_form(payload).await?;
    let form = CertificateForm::from_fields(received.text).map_err(CreateError::MissingField)?;

    if store.find_by_number(&form.certificate_number)?.is_some() {
        return Err(StoreError::Duplicate.into());
    }

    let file_path = match received.file {
        Some(bytes) => {
            let format = image::guess_format(&bytes).map_err(|_| CreateError::NotAnImage)?;
            Some(uploads.save(format, &bytes).await?)
        }
        None => None,
    };

    Ok(store.create(&form, file_path)?)
}
