use super::RecordStore;
use crate::error::{IntakeError, Result};
use crate::submission::SubmittableCertificate;
use common::model::certificate::Certificate;
use common::requests::fields;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{header, RequestBuilder};

const CERTIFICATES_PATH: &str = "/api/certificates";
const USER_AGENT: &str = concat!("intake/", env!("CARGO_PKG_VERSION"));

/// Record store reached over HTTP.
///
/// Cookies set by the server are kept for the lifetime of the client; a
/// session cookie from configuration is attached to every request.
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, session_cookie: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|e| IntakeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CERTIFICATES_PATH)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(header::COOKIE, cookie.as_str()),
            None => request,
        }
    }

    fn multipart(certificate: &SubmittableCertificate) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in certificate.form.text_fields() {
            form = form.text(name, value.to_string());
        }
        if let Some(image) = &certificate.image {
            let mime = mime_guess::from_path(image.file_name()).first_or_octet_stream();
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name().to_string())
                .mime_str(mime.as_ref())
                .map_err(|e| IntakeError::Transport(e.to_string()))?;
            form = form.part(fields::FILE, part);
        }
        Ok(form)
    }
}

impl RecordStore for HttpRecordStore {
    async fn clear_all(&self) -> Result<()> {
        let response = self
            .with_session(self.client.delete(self.endpoint()))
            .send()
            .await
            .map_err(|e| IntakeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntakeError::Transport(format!(
                "clearing certificates returned {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    async fn create(&self, certificate: &SubmittableCertificate) -> Result<Certificate> {
        let number = certificate.form.certificate_number.clone();
        let rejected = |detail: String| IntakeError::Submission {
            certificate_number: number.clone(),
            detail,
        };

        let response = self
            .with_session(self.client.post(self.endpoint()))
            .multipart(Self::multipart(certificate)?)
            .send()
            .await
            .map_err(|e| rejected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(rejected(detail));
        }

        debug!("Created certificate {} ({})", number, status);
        response
            .json::<Certificate>()
            .await
            .map_err(|e| rejected(e.to_string()))
    }
}
