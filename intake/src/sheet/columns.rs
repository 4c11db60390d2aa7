//! Heuristic mapping of human-written column headers to certificate fields.
//!
//! Matching works on a compacted form of both sides (lower-cased, whitespace
//! removed). A field first tries its candidate substrings in priority order;
//! for each candidate the headers are scanned in file order. Only when no
//! candidate hits does the looser fallback run: a header matches a fallback
//! group when it contains every token of the group.
//!
//! Precedence is candidate-major: a more specific candidate listed earlier
//! beats a looser one even when the looser match sits in an earlier column.
//! Scanning header-major instead (first column matching any candidate) would
//! let a "Report No (old)" column shadow a later "Lab Report No", so a sheet
//! whose identifier header spells out "lab report no" would not always
//! resolve to that header.
//!
//! The candidate lists live in a [`ColumnProfile`] so that precedence is data.
//! The built-in profile is version 1; a replacement can be loaded from TOML.

use crate::error::{IntakeError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version of [`ColumnProfile::builtin`].
pub const BUILTIN_PROFILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    LabReportNumber,
    Description,
    GrossWeight,
    TotalEstWeight,
    ShapeCut,
    Color,
    Clarity,
    Comments,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::LabReportNumber,
        CanonicalField::Description,
        CanonicalField::GrossWeight,
        CanonicalField::TotalEstWeight,
        CanonicalField::ShapeCut,
        CanonicalField::Color,
        CanonicalField::Clarity,
        CanonicalField::Comments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::LabReportNumber => "labReportNumber",
            CanonicalField::Description => "description",
            CanonicalField::GrossWeight => "grossWeight",
            CanonicalField::TotalEstWeight => "totalEstWeight",
            CanonicalField::ShapeCut => "shapeCut",
            CanonicalField::Color => "color",
            CanonicalField::Clarity => "clarity",
            CanonicalField::Comments => "comments",
        }
    }
}

/// Matching rule for one canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: CanonicalField,
    /// Substrings tried in order; the first one found in any header wins.
    #[serde(default)]
    pub candidates: Vec<String>,
    /// Token groups for the loose pass. Every token of a group must appear.
    #[serde(default)]
    pub fallback: Vec<Vec<String>>,
}

impl FieldRule {
    fn new(field: CanonicalField, candidates: &[&str], fallback: &[&[&str]]) -> Self {
        FieldRule {
            field,
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            fallback: fallback
                .iter()
                .map(|group| group.iter().map(|t| t.to_string()).collect())
                .collect(),
        }
    }

    fn resolve<'h>(&self, compacted: &[(&'h str, String)]) -> Option<&'h str> {
        for candidate in &self.candidates {
            let needle = compact(candidate);
            if needle.is_empty() {
                continue;
            }
            if let Some((header, _)) = compacted.iter().find(|(_, c)| c.contains(&needle)) {
                return Some(header);
            }
        }
        for group in &self.fallback {
            let tokens: Vec<String> = group.iter().map(|t| compact(t)).collect();
            if tokens.iter().all(|t| t.is_empty()) {
                continue;
            }
            if let Some((header, _)) = compacted
                .iter()
                .find(|(_, c)| tokens.iter().all(|t| c.contains(t.as_str())))
            {
                return Some(header);
            }
        }
        None
    }
}

/// Ordered candidate lists for every canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub version: u32,
    pub fields: Vec<FieldRule>,
}

impl ColumnProfile {
    pub fn builtin() -> Self {
        use CanonicalField::*;
        ColumnProfile {
            version: BUILTIN_PROFILE_VERSION,
            fields: vec![
                FieldRule::new(
                    LabReportNumber,
                    &[
                        "labReportNo",
                        "lab report no",
                        "lab_report_no",
                        "reportNo",
                        "report no",
                        "report_no",
                        "labNo",
                        "lab no",
                        "lab_no",
                        "certificateNo",
                        "certificate no",
                        "certificate_no",
                    ],
                    &[&["lab", "report"]],
                ),
                FieldRule::new(
                    Description,
                    &["description", "stone type", "stone_type", "type"],
                    &[&["desc"]],
                ),
                FieldRule::new(
                    GrossWeight,
                    &["gross weight", "gross_weight", "weight"],
                    &[&["gross"]],
                ),
                FieldRule::new(
                    TotalEstWeight,
                    &[
                        "total est weight",
                        "total_est_weight",
                        "est weight",
                        "estimated weight",
                    ],
                    &[&["est"]],
                ),
                FieldRule::new(ShapeCut, &["shape/cut", "shape_cut", "cut"], &[&["cut"]]),
                FieldRule::new(Color, &["color", "colour"], &[&["color"]]),
                FieldRule::new(Clarity, &["clarity"], &[&["clarity"]]),
                FieldRule::new(
                    Comments,
                    &["comments", "remarks"],
                    &[&["comment"], &["note"]],
                ),
            ],
        }
    }

    /// Parses a profile from TOML text.
    ///
    /// The profile must carry a rule for the lab report number field, otherwise
    /// every resolution would fail.
    pub fn from_toml(text: &str) -> Result<Self> {
        let profile: ColumnProfile =
            toml::from_str(text).map_err(|e| IntakeError::Config(e.to_string()))?;
        if profile.rule(CanonicalField::LabReportNumber).is_none() {
            return Err(IntakeError::Config(
                "column profile has no rule for labReportNumber".to_string(),
            ));
        }
        Ok(profile)
    }

    pub fn rule(&self, field: CanonicalField) -> Option<&FieldRule> {
        self.fields.iter().find(|r| r.field == field)
    }

    /// Resolves each canonical field to at most one header.
    ///
    /// Fails with [`IntakeError::ColumnNotFound`] when the lab report number
    /// field stays unresolved. Any other field may stay unresolved.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> Result<ColumnMapping> {
        let compacted: Vec<(&str, String)> = headers
            .iter()
            .map(|h| (h.as_ref(), compact(h.as_ref())))
            .collect();

        let mut columns = HashMap::new();
        for field in CanonicalField::ALL {
            if let Some(header) = self.rule(field).and_then(|r| r.resolve(&compacted)) {
                columns.insert(field, header.to_string());
            }
        }

        if !columns.contains_key(&CanonicalField::LabReportNumber) {
            return Err(IntakeError::ColumnNotFound {
                headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            });
        }

        debug!("Resolved columns (profile v{}): {:?}", self.version, columns);
        Ok(ColumnMapping { columns })
    }
}

impl Default for ColumnProfile {
    fn default() -> Self {
        ColumnProfile::builtin()
    }
}

/// Canonical field → header found in the uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: HashMap<CanonicalField, String>,
}

impl ColumnMapping {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }
}

fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
