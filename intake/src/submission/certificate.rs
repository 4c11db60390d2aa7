use crate::error::{IntakeError, Result};
use crate::images::{ImageBinding, SourceImage};
use crate::sheet::CandidateRecord;
use chrono::Datelike;
use common::requests::CertificateForm;
use rand::Rng;

const DEFAULT_STONE_TYPE: &str = "Gemstone";
const UNKNOWN: &str = "Unknown";

/// A certificate ready to be posted, with at most one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittableCertificate {
    pub form: CertificateForm,
    pub image: Option<SourceImage>,
}

impl SubmittableCertificate {
    /// Joins a candidate row with the first image bound to its report number.
    ///
    /// `row` is the 1-based data row used in error messages. Fails when the
    /// report number is blank after trimming.
    pub fn prepare(row: usize, candidate: &CandidateRecord, binding: &ImageBinding) -> Result<Self> {
        let number = candidate.lab_report_number.trim();
        if number.is_empty() {
            return Err(IntakeError::Validation {
                row,
                detail: or_default(&candidate.description, UNKNOWN).to_string(),
            });
        }

        let carat = [&candidate.total_estimated_weight, &candidate.gross_weight]
            .into_iter()
            .map(|w| w.trim())
            .find(|w| !w.is_empty())
            .unwrap_or("0");

        let form = CertificateForm {
            certificate_number: number.to_string(),
            stone_type: or_default(&candidate.description, DEFAULT_STONE_TYPE).to_string(),
            carat: carat.to_string(),
            gross_weight: candidate.gross_weight.trim().to_string(),
            color: or_default(&candidate.color, UNKNOWN).to_string(),
            clarity: or_default(&candidate.clarity, UNKNOWN).to_string(),
            cut: or_default(&candidate.shape_cut, UNKNOWN).to_string(),
            notes: format!(
                "Lab Report: {}\nGross Weight: {}\n{}",
                number,
                candidate.gross_weight.trim(),
                candidate.comments.trim()
            ),
        };

        Ok(SubmittableCertificate {
            form,
            image: binding.first(number).cloned(),
        })
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Number for a manually entered certificate: `AIGI-<year>-<6 digits>`.
pub fn generate_certificate_number() -> String {
    let year = chrono::Local::now().year();
    let serial: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("AIGI-{}-{}", year, serial)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(number: &str) -> CandidateRecord {
        CandidateRecord {
            lab_report_number: number.to_string(),
            ..Default::default()
        }
    }

    fn image(name: &str) -> SourceImage {
        SourceImage::new(name, name.as_bytes().to_vec())
    }

    #[test]
    fn first_bound_image_is_attached() {
        let mut binding = ImageBinding::new();
        binding.bind("1001", image("imgA"));
        binding.bind("1002", image("imgB"));
        binding.bind("1002", image("imgC"));

        let attached: Vec<Option<String>> = ["1001", "1002", "1003"]
            .iter()
            .enumerate()
            .map(|(i, n)| {
                SubmittableCertificate::prepare(i + 1, &candidate(n), &binding)
                    .unwrap()
                    .image
                    .map(|img| img.name)
            })
            .collect();
        assert_eq!(
            attached,
            vec![Some("imgA".to_string()), Some("imgB".to_string()), None]
        );
    }

    #[test]
    fn defaults_fill_blank_fields() {
        let cert = SubmittableCertificate::prepare(1, &candidate(" 1001 "), &ImageBinding::new())
            .unwrap();
        assert_eq!(cert.form.certificate_number, "1001");
        assert_eq!(cert.form.stone_type, "Gemstone");
        assert_eq!(cert.form.carat, "0");
        assert_eq!(cert.form.color, "Unknown");
        assert_eq!(cert.form.clarity, "Unknown");
        assert_eq!(cert.form.cut, "Unknown");
        assert_eq!(cert.form.notes, "Lab Report: 1001\nGross Weight: \n");
    }

    #[test]
    fn carat_prefers_estimated_then_gross_weight() {
        let mut row = CandidateRecord {
            lab_report_number: "1".into(),
            gross_weight: "2.50".into(),
            total_estimated_weight: "2.31".into(),
            comments: "Heated".into(),
            ..Default::default()
        };
        let cert = SubmittableCertificate::prepare(1, &row, &ImageBinding::new()).unwrap();
        assert_eq!(cert.form.carat, "2.31");
        assert_eq!(cert.form.gross_weight, "2.50");
        assert_eq!(cert.form.notes, "Lab Report: 1\nGross Weight: 2.50\nHeated");

        row.total_estimated_weight.clear();
        let cert = SubmittableCertificate::prepare(1, &row, &ImageBinding::new()).unwrap();
        assert_eq!(cert.form.carat, "2.50");
    }

    #[test]
    fn blank_number_is_a_validation_error_for_that_row() {
        let row = CandidateRecord {
            lab_report_number: "   ".into(),
            description: "Blue Sapphire".into(),
            ..Default::default()
        };
        let err = SubmittableCertificate::prepare(2, &row, &ImageBinding::new()).unwrap_err();
        match err {
            IntakeError::Validation { row, detail } => {
                assert_eq!(row, 2);
                assert_eq!(detail, "Blue Sapphire");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn generated_numbers_follow_the_house_format() {
        let number = generate_certificate_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "AIGI");
        assert_eq!(parts[1].len(), 4);
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
