use serde::{Deserialize, Serialize};

/// A certificate as stored by the record store and returned by its endpoints.
///
/// Field names are serialized in camelCase because that is what the public
/// verification page and the intake client read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub certificate_number: String,
    pub stone_type: String,
    pub carat: String,
    pub gross_weight: Option<String>,
    pub color: String,
    pub clarity: String,
    pub cut: String,
    pub notes: Option<String>,
    /// Public path of the stored image, e.g. `/uploads/<md5>.jpg`.
    pub file_path: Option<String>,
    pub issued_date: String,
}
