//! The bulk upload wizard: one owner for the parsed rows and the image
//! binding, moving through Idle → AwaitingImages → Submitting → Complete.
//!
//! ```text
//! Idle ──load_spreadsheet──▶ ParsingSpreadsheet ──ok──▶ AwaitingImages ◀─┐
//!   ▲                              │ err                  │   add_images ─┘
//!   └──────────────────────────────┘                      ▼ submit
//!                                        AwaitingImages ◀─err── Submitting ──ok──▶ Complete
//! ```
//!
//! `reset` returns to Idle from anywhere and drops all rows and images.

use crate::error::{IntakeError, Result};
use crate::images::{bind_images, BindReport, ImageBinding, ImageInput, LabelReader};
use crate::sheet::{parse_candidates, CandidateRecord, ColumnProfile};
use crate::store::RecordStore;
use crate::submission::submit_batch;
use common::jobs::BatchStatus;
use common::model::certificate::Certificate;
use log::info;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Idle,
    ParsingSpreadsheet,
    AwaitingImages,
    Submitting,
    Complete,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Idle => "idle",
            WizardStep::ParsingSpreadsheet => "parsing a spreadsheet",
            WizardStep::AwaitingImages => "awaiting images",
            WizardStep::Submitting => "submitting",
            WizardStep::Complete => "complete",
        }
    }
}

pub struct Wizard {
    step: WizardStep,
    profile: ColumnProfile,
    candidates: Vec<CandidateRecord>,
    binding: ImageBinding,
}

impl Wizard {
    pub fn new(profile: ColumnProfile) -> Self {
        Wizard {
            step: WizardStep::Idle,
            profile,
            candidates: Vec::new(),
            binding: ImageBinding::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn candidates(&self) -> &[CandidateRecord] {
        &self.candidates
    }

    pub fn binding(&self) -> &ImageBinding {
        &self.binding
    }

    /// Parses a spreadsheet into candidate rows.
    ///
    /// Allowed while idle or while awaiting images (a re-upload replaces the
    /// rows and keeps the images). Any failure returns the wizard to Idle
    /// with nothing retained.
    pub fn load_spreadsheet(&mut self, file_name: &str, bytes: &[u8]) -> Result<usize> {
        self.expect_step("load a spreadsheet", &[WizardStep::Idle, WizardStep::AwaitingImages])?;
        self.step = WizardStep::ParsingSpreadsheet;

        match parse_candidates(file_name, bytes, &self.profile) {
            Ok(candidates) => {
                self.candidates = candidates;
                self.step = WizardStep::AwaitingImages;
                Ok(self.candidates.len())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Runs one image pass and replaces the binding with its result.
    ///
    /// The binding is only reassigned once the whole pass succeeded.
    pub async fn add_images<R: LabelReader>(
        &mut self,
        inputs: Vec<ImageInput>,
        reader: &R,
    ) -> Result<BindReport> {
        self.expect_step("add images", &[WizardStep::AwaitingImages])?;
        let (binding, report) = bind_images(&self.binding, inputs, reader).await?;
        info!(
            "Image pass: {} processed, {} bound, {} without a report number",
            report.processed,
            report.bound,
            report.missed.len()
        );
        self.binding = binding;
        Ok(report)
    }

    /// Replaces the record store's certificates with the parsed rows.
    ///
    /// On failure the wizard goes back to awaiting images; whatever was created
    /// before the failing row stays in the store.
    pub async fn submit<S: RecordStore>(
        &mut self,
        store: &S,
        progress: Option<&mpsc::Sender<BatchStatus>>,
    ) -> Result<Vec<Certificate>> {
        self.expect_step("submit", &[WizardStep::AwaitingImages])?;
        if self.candidates.is_empty() {
            return Err(IntakeError::EmptySheet);
        }

        self.step = WizardStep::Submitting;
        let result = submit_batch(store, &self.candidates, &self.binding, progress).await;
        self.step = match result {
            Ok(_) => WizardStep::Complete,
            Err(_) => WizardStep::AwaitingImages,
        };
        result
    }

    pub fn reset(&mut self) {
        self.step = WizardStep::Idle;
        self.candidates = Vec::new();
        self.binding = ImageBinding::new();
    }

    fn expect_step(&self, action: &'static str, allowed: &[WizardStep]) -> Result<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(IntakeError::InvalidStep {
                action,
                step: self.step.as_str(),
            })
        }
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Wizard::new(ColumnProfile::builtin())
    }
}
