//! Label extraction: turning a certificate photo into text.

use super::SourceImage;
use crate::error::{IntakeError, Result};
use image::ImageFormat;
use log::debug;
use std::path::PathBuf;
use tokio::process::Command;

/// Optical character recognition over one image.
#[allow(async_fn_in_trait)]
pub trait LabelReader {
    /// Returns the raw recognized text. Bytes that do not decode as an image
    /// yield [`IntakeError::Undecodable`]; an engine failure yields
    /// [`IntakeError::Recognition`]. Text without a report number is not an error.
    async fn read_text(&self, image: &SourceImage) -> Result<String>;
}

/// Runs the `tesseract` executable on each image.
///
/// The image is decoded, converted to grayscale and written as PNG to a
/// temporary file which is removed once recognition returns.
#[derive(Debug, Clone)]
pub struct TesseractReader {
    binary: PathBuf,
    language: String,
}

impl TesseractReader {
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        TesseractReader {
            binary: binary.into(),
            language: language.into(),
        }
    }
}

impl Default for TesseractReader {
    fn default() -> Self {
        TesseractReader::new("tesseract", "eng")
    }
}

impl LabelReader for TesseractReader {
    async fn read_text(&self, image: &SourceImage) -> Result<String> {
        let prepared = prepare_for_recognition(image)?;

        let output = Command::new(&self.binary)
            .arg(prepared.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(|e| IntakeError::Recognition {
                image: image.name.clone(),
                detail: format!("could not run {}: {}", self.binary.display(), e),
            })?;

        if !output.status.success() {
            return Err(IntakeError::Recognition {
                image: image.name.clone(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Recognized {} chars from {}", text.len(), image.name);
        Ok(text)
    }
}

fn prepare_for_recognition(image: &SourceImage) -> Result<tempfile::NamedTempFile> {
    let gray = image::load_from_memory(&image.bytes)
        .map_err(|e| IntakeError::Undecodable {
            image: image.name.clone(),
            detail: e.to_string(),
        })?
        .to_luma8();
    let file = tempfile::Builder::new()
        .prefix("intake-label-")
        .suffix(".png")
        .tempfile()?;
    gray.save_with_format(file.path(), ImageFormat::Png)
        .map_err(|e| IntakeError::Recognition {
            image: image.name.clone(),
            detail: e.to_string(),
        })?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([200, 10, 10]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn prepared_file_is_a_grayscale_png() {
        let source = SourceImage::new("label.png", tiny_png());
        let file = prepare_for_recognition(&source).unwrap();
        let reread = image::open(file.path()).unwrap();
        assert_eq!(reread.color(), image::ColorType::L8);
        assert_eq!((reread.width(), reread.height()), (4, 4));
    }

    #[test]
    fn undecodable_bytes_are_reported_as_such() {
        let source = SourceImage::new("label.jpg", b"not an image".to_vec());
        let err = prepare_for_recognition(&source).unwrap_err();
        assert!(matches!(err, IntakeError::Undecodable { ref image, .. } if image == "label.jpg"));
    }

    #[tokio::test]
    async fn missing_engine_is_reported_as_recognition_failure() {
        let reader = TesseractReader::new("/nonexistent/tesseract-binary", "eng");
        let source = SourceImage::new("label.png", tiny_png());
        let err = reader.read_text(&source).await.unwrap_err();
        assert!(matches!(err, IntakeError::Recognition { .. }));
    }
}
