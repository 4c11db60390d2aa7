use crate::error::{IntakeError, Result};
use crate::sheet::ColumnProfile;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line configuration for the `intake` binary.
#[derive(Parser, Debug)]
#[command(name = "intake")]
#[command(about = "Bulk and manual certificate publishing for the record store")]
#[command(version)]
pub struct Cli {
    /// Base URL of the record store
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080", env = "INTAKE_SERVER")]
    pub server: String,

    /// Cookie header value sent with every request (e.g. `connect.sid=...`)
    #[arg(long, global = true, env = "INTAKE_SESSION_COOKIE")]
    pub session_cookie: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace all certificates with the rows of a spreadsheet
    Bulk(BulkArgs),
    /// Publish a single certificate without touching the others
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct BulkArgs {
    /// Spreadsheet with one certificate per row (.xlsx, .xls, .ods or .csv)
    #[arg(long)]
    pub sheet: PathBuf,

    /// Certificate images or .zip archives of images, processed in order
    #[arg(long = "images", num_args = 1..)]
    pub images: Vec<PathBuf>,

    /// Tesseract executable used to read the report number off each image
    #[arg(long, default_value = "tesseract", env = "INTAKE_TESSERACT")]
    pub tesseract: PathBuf,

    /// Tesseract language
    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    /// TOML column profile replacing the built-in header candidates
    #[arg(long)]
    pub columns: Option<PathBuf>,

    /// Do not ask before clearing the existing certificates
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Certificate number; generated when omitted
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub stone_type: String,
    #[arg(long)]
    pub carat: String,
    #[arg(long, default_value = "")]
    pub gross_weight: String,
    #[arg(long)]
    pub color: String,
    #[arg(long)]
    pub clarity: String,
    #[arg(long)]
    pub cut: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Optional certificate image
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// Loads the column profile from `path`, or the built-in one.
pub fn load_profile(path: Option<&Path>) -> Result<ColumnProfile> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                IntakeError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            ColumnProfile::from_toml(&text)
        }
        None => Ok(ColumnProfile::builtin()),
    }
}

/// Final path component, used as the upload name.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
