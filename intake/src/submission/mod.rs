//! Turning candidate rows plus bound images into created certificates.

mod certificate;
mod controller;

pub use certificate::{generate_certificate_number, SubmittableCertificate};
pub use controller::submit_batch;
