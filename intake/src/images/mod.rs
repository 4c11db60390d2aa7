//! Image side of the intake pipeline.
//!
//! Uploaded images (or images inside a zip archive) are read by a
//! [`LabelReader`], the recognized text is searched for a lab report number
//! and the image is bound to that number.

pub mod archive;
pub mod binder;
pub mod ocr;
pub mod report_number;

pub use archive::expand_archive;
pub use binder::{bind_images, BindReport, ImageBinding};
pub use ocr::{LabelReader, TesseractReader};
pub use report_number::extract_report_number;

use std::path::Path;

/// Raster extensions honoured inside archives.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// An uploaded image and the name it arrived under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceImage {
            name: name.into(),
            bytes,
        }
    }

    /// Last path component of the name, as used when uploading the file.
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// One item of an image upload: either a loose file or a zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    File(SourceImage),
    Archive(SourceImage),
}

impl ImageInput {
    /// Classifies an upload by its name: `.zip` is an archive, anything else a file.
    pub fn classify(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let source = SourceImage::new(name, bytes);
        if has_extension(&source.name, &["zip"]) {
            ImageInput::Archive(source)
        } else {
            ImageInput::File(source)
        }
    }
}

pub(crate) fn has_extension(name: &str, allowed: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.iter().any(|a| e.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

/// Whether a loose upload is an image the label reader can decode: its guessed
/// mime type is `image/*` and its extension is one of [`IMAGE_EXTENSIONS`].
pub(crate) fn is_image_file(name: &str) -> bool {
    let is_image_mime = mime_guess::from_path(name)
        .first()
        .map(|m| m.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false);
    is_image_mime && has_extension(name, &IMAGE_EXTENSIONS)
}
