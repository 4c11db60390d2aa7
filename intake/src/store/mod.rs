//! The record store as seen by the intake pipeline.
//!
//! Only the two calls a bulk batch needs are modelled: the destructive clear
//! and the per-certificate create.

mod http;

pub use http::HttpRecordStore;

use crate::error::Result;
use crate::submission::SubmittableCertificate;
use common::model::certificate::Certificate;

#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Deletes every stored certificate.
    async fn clear_all(&self) -> Result<()>;

    /// Creates one certificate. A rejection is reported as
    /// [`IntakeError::Submission`](crate::error::IntakeError::Submission)
    /// naming the certificate number.
    async fn create(&self, certificate: &SubmittableCertificate) -> Result<Certificate>;
}
