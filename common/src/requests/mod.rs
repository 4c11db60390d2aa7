use std::collections::HashMap;

/// Multipart field names of `POST /api/certificates`.
pub mod fields {
    pub const CERTIFICATE_NUMBER: &str = "certificateNumber";
    pub const STONE_TYPE: &str = "stoneType";
    pub const CARAT: &str = "carat";
    pub const GROSS_WEIGHT: &str = "grossWeight";
    pub const COLOR: &str = "color";
    pub const CLARITY: &str = "clarity";
    pub const CUT: &str = "cut";
    pub const NOTES: &str = "notes";
    pub const FILE: &str = "file";
}

/// Text part of a certificate create request.
///
/// The intake client builds one per submitted row; the record store rebuilds it
/// from the multipart fields it received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateForm {
    pub certificate_number: String,
    pub stone_type: String,
    pub carat: String,
    pub gross_weight: String,
    pub color: String,
    pub clarity: String,
    pub cut: String,
    pub notes: String,
}

impl CertificateForm {
    /// Field name / value pairs in the order they are sent.
    pub fn text_fields(&self) -> [(&'static str, &str); 8] {
        [
            (fields::CERTIFICATE_NUMBER, self.certificate_number.as_str()),
            (fields::STONE_TYPE, self.stone_type.as_str()),
            (fields::CARAT, self.carat.as_str()),
            (fields::GROSS_WEIGHT, self.gross_weight.as_str()),
            (fields::COLOR, self.color.as_str()),
            (fields::CLARITY, self.clarity.as_str()),
            (fields::CUT, self.cut.as_str()),
            (fields::NOTES, self.notes.as_str()),
        ]
    }

    /// Rebuilds a form from received text fields.
    ///
    /// Values are trimmed. Returns the name of the first required field that is
    /// missing or blank.
    pub fn from_fields(mut received: HashMap<String, String>) -> Result<Self, &'static str> {
        let mut take = |name: &'static str| {
            received
                .remove(name)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let form = CertificateForm {
            certificate_number: take(fields::CERTIFICATE_NUMBER),
            stone_type: take(fields::STONE_TYPE),
            carat: take(fields::CARAT),
            gross_weight: take(fields::GROSS_WEIGHT),
            color: take(fields::COLOR),
            clarity: take(fields::CLARITY),
            cut: take(fields::CUT),
            notes: take(fields::NOTES),
        };
        for (name, value) in [
            (fields::CERTIFICATE_NUMBER, &form.certificate_number),
            (fields::STONE_TYPE, &form.stone_type),
            (fields::CARAT, &form.carat),
            (fields::COLOR, &form.color),
            (fields::CLARITY, &form.clarity),
            (fields::CUT, &form.cut),
        ] {
            if value.is_empty() {
                return Err(name);
            }
        }
        Ok(form)
    }
}
