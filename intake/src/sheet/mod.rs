//! Spreadsheet side of the intake pipeline: reading the upload, resolving its
//! columns and building one [`CandidateRecord`] per row.

pub mod candidate;
pub mod columns;
pub mod reader;

pub use candidate::{parse_candidates, CandidateRecord};
pub use columns::{CanonicalField, ColumnMapping, ColumnProfile};
