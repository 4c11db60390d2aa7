//! Bulk certificate intake: a spreadsheet of lab report rows plus a set of
//! labelled certificate photos, matched by OCR and written to the record store.

pub mod config;
pub mod error;
pub mod images;
pub mod sheet;
pub mod store;
pub mod submission;
pub mod wizard;

pub use error::{IntakeError, Result};
pub use wizard::{Wizard, WizardStep};
