use super::archive::expand_archive;
use super::ocr::LabelReader;
use super::report_number::extract_report_number;
use super::{is_image_file, ImageInput, SourceImage};
use crate::error::{IntakeError, Result};
use log::{info, warn};

/// Lab report number → images bound to it, both in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBinding {
    entries: Vec<(String, Vec<SourceImage>)>,
}

impl ImageBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `image` to the entry for `report_number`, creating it if absent.
    pub fn bind(&mut self, report_number: impl Into<String>, image: SourceImage) {
        let report_number = report_number.into();
        match self.entries.iter_mut().find(|(id, _)| *id == report_number) {
            Some((_, images)) => images.push(image),
            None => self.entries.push((report_number, vec![image])),
        }
    }

    pub fn images(&self, report_number: &str) -> &[SourceImage] {
        self.entries
            .iter()
            .find(|(id, _)| id == report_number)
            .map(|(_, images)| images.as_slice())
            .unwrap_or(&[])
    }

    /// The image attached when the certificate is submitted.
    pub fn first(&self, report_number: &str) -> Option<&SourceImage> {
        self.images(report_number).first()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SourceImage])> {
        self.entries
            .iter()
            .map(|(id, images)| (id.as_str(), images.as_slice()))
    }

    /// Number of distinct report numbers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of one image pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Images handed to the label reader.
    pub processed: usize,
    pub bound: usize,
    /// Names of images that did not decode or whose text carried no report number.
    pub missed: Vec<String>,
    /// Loose uploads skipped because they are not images.
    pub skipped: Vec<String>,
}

/// Runs one image pass over `inputs` and returns the extended binding.
///
/// Images are read one at a time, in input order; archives are expanded in
/// place. An image that does not decode, or whose label carries no report
/// number, is logged and recorded in [`BindReport::missed`]. Any other error
/// (an unreadable archive, a failing engine) aborts the pass, and since
/// `current` is only read the caller's binding is left as it was.
pub async fn bind_images<R: LabelReader>(
    current: &ImageBinding,
    inputs: Vec<ImageInput>,
    reader: &R,
) -> Result<(ImageBinding, BindReport)> {
    let mut next = current.clone();
    let mut report = BindReport::default();

    for input in inputs {
        let images = match input {
            ImageInput::Archive(archive) => expand_archive(&archive)?,
            ImageInput::File(file) if is_image_file(&file.name) => vec![file],
            ImageInput::File(file) => {
                warn!("Skipping {}: not an image", file.name);
                report.skipped.push(file.name);
                continue;
            }
        };

        for image in images {
            report.processed += 1;
            let text = match reader.read_text(&image).await {
                Ok(text) => text,
                Err(IntakeError::Undecodable { detail, .. }) => {
                    warn!("Skipping {}: {}", image.name, detail);
                    report.missed.push(image.name);
                    continue;
                }
                Err(e) => return Err(e),
            };
            match extract_report_number(&text) {
                Some(report_number) => {
                    info!("Bound {} to lab report {}", image.name, report_number);
                    next.bind(report_number, image);
                    report.bound += 1;
                }
                None => {
                    warn!("Could not extract lab report number from {}", image.name);
                    report.missed.push(image.name);
                }
            }
        }
    }

    Ok((next, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::archive::tests::zip_of;
    use crate::images::TesseractReader;
    use std::collections::HashMap;

    /// Reads the "label" straight from the image bytes.
    struct EchoReader;

    impl LabelReader for EchoReader {
        async fn read_text(&self, image: &SourceImage) -> Result<String> {
            Ok(String::from_utf8_lossy(&image.bytes).into_owned())
        }
    }

    struct FailingReader(HashMap<String, String>);

    impl LabelReader for FailingReader {
        async fn read_text(&self, image: &SourceImage) -> Result<String> {
            self.0
                .get(&image.name)
                .cloned()
                .ok_or_else(|| IntakeError::Recognition {
                    image: image.name.clone(),
                    detail: "engine crashed".into(),
                })
        }
    }

    fn file(name: &str, label: &str) -> ImageInput {
        ImageInput::classify(name, label.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn groups_images_by_report_number_in_order() {
        let inputs = vec![
            file("a.jpg", "Lab Report No: 1001"),
            file("b.jpg", "Report No. 1002"),
            file("c.png", "Lab No 1002"),
            file("d.gif", "blurry"),
        ];
        let (binding, report) = bind_images(&ImageBinding::new(), inputs, &EchoReader)
            .await
            .unwrap();

        assert_eq!(binding.len(), 2);
        assert_eq!(binding.first("1001").unwrap().name, "a.jpg");
        let names: Vec<&str> = binding.images("1002").iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b.jpg", "c.png"]);
        assert_eq!(report.processed, 4);
        assert_eq!(report.bound, 3);
        assert_eq!(report.missed, vec!["d.gif".to_string()]);
    }

    #[tokio::test]
    async fn archives_are_expanded_and_non_images_skipped() {
        let archive = zip_of(&[
            ("photo1.jpg", b"Lab Report No: 7"),
            ("notes.txt", b"Lab Report No: 8"),
            ("sub/photo2.png", b"Lab Report No: 7"),
        ]);
        let inputs = vec![
            ImageInput::classify("batch.zip", archive),
            file("readme.txt", "Lab Report No: 9"),
        ];
        let (binding, report) = bind_images(&ImageBinding::new(), inputs, &EchoReader)
            .await
            .unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(binding.images("7").len(), 2);
        assert!(binding.images("8").is_empty());
        assert_eq!(report.skipped, vec!["readme.txt".to_string()]);
    }

    #[tokio::test]
    async fn later_pass_extends_existing_binding() {
        let (first, _) = bind_images(&ImageBinding::new(), vec![file("a.jpg", "Lab No 1")], &EchoReader)
            .await
            .unwrap();
        let (second, _) = bind_images(&first, vec![file("b.jpg", "Lab No 1")], &EchoReader)
            .await
            .unwrap();
        assert_eq!(first.images("1").len(), 1);
        assert_eq!(second.images("1").len(), 2);
    }

    #[tokio::test]
    async fn engine_failure_aborts_pass() {
        let reader = FailingReader(HashMap::from([(
            "a.jpg".to_string(),
            "Lab No 1".to_string(),
        )]));
        let inputs = vec![file("a.jpg", ""), file("b.jpg", "")];
        let err = bind_images(&ImageBinding::new(), inputs, &reader)
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Recognition { ref image, .. } if image == "b.jpg"));
    }

    /// Reads the label from the bytes, but refuses names starting with "bad".
    struct PickyReader;

    impl LabelReader for PickyReader {
        async fn read_text(&self, image: &SourceImage) -> Result<String> {
            if image.file_name().starts_with("bad") {
                return Err(IntakeError::Undecodable {
                    image: image.name.clone(),
                    detail: "unsupported format".into(),
                });
            }
            Ok(String::from_utf8_lossy(&image.bytes).into_owned())
        }
    }

    #[tokio::test]
    async fn undecodable_image_does_not_stop_the_pass() {
        let archive = zip_of(&[
            ("bad1.jpg", b"Lab Report No: 5"),
            ("photo1.jpg", b"Lab Report No: 5"),
        ]);
        let inputs = vec![
            file("bad0.png", "Lab Report No: 4"),
            file("scan.bmp", "Lab Report No: 4"),
            ImageInput::classify("batch.zip", archive),
            file("c.jpg", "Lab Report No: 6"),
        ];
        let (binding, report) = bind_images(&ImageBinding::new(), inputs, &PickyReader)
            .await
            .unwrap();

        assert_eq!(report.processed, 4);
        assert_eq!(report.bound, 2);
        assert_eq!(report.missed, vec!["bad0.png".to_string(), "bad1.jpg".to_string()]);
        assert_eq!(report.skipped, vec!["scan.bmp".to_string()]);
        assert_eq!(binding.first("5").unwrap().name, "photo1.jpg");
        assert_eq!(binding.first("6").unwrap().name, "c.jpg");
        assert!(binding.images("4").is_empty());
    }

    #[tokio::test]
    async fn corrupt_image_is_a_miss_for_the_tesseract_reader() {
        // Decoding fails before the engine is spawned, so the binary is never needed.
        let reader = TesseractReader::new("/nonexistent/tesseract-binary", "eng");
        let inputs = vec![file("corrupt.jpg", "not really a jpeg")];
        let (binding, report) = bind_images(&ImageBinding::new(), inputs, &reader)
            .await
            .unwrap();
        assert!(binding.is_empty());
        assert_eq!(report.missed, vec!["corrupt.jpg".to_string()]);
    }
}
