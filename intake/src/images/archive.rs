use super::{has_extension, SourceImage, IMAGE_EXTENSIONS};
use crate::error::{IntakeError, Result};
use log::{debug, warn};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Extracts the raster-image entries of a zip archive, in directory order.
///
/// Directory entries and macOS resource forks (`__MACOSX/`, `._name`) are
/// skipped silently; other non-image entries are skipped with a warning. Entry
/// names keep their in-archive path.
pub fn expand_archive(archive: &SourceImage) -> Result<Vec<SourceImage>> {
    let mut zip = ZipArchive::new(Cursor::new(archive.bytes.as_slice()))
        .map_err(|e| IntakeError::Archive(format!("{}: {}", archive.name, e)))?;

    let mut images = Vec::new();
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| IntakeError::Archive(format!("{}: {}", archive.name, e)))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if is_resource_fork(&name) {
            debug!("Skipping resource fork {} in {}", name, archive.name);
            continue;
        }
        if !has_extension(&name, &IMAGE_EXTENSIONS) {
            warn!("Skipping non-image entry {} in {}", name, archive.name);
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
        entry.read_to_end(&mut bytes)?;
        debug!("Extracted {} ({} bytes)", name, bytes.len());
        images.push(SourceImage::new(name, bytes));
    }
    Ok(images)
}

fn is_resource_fork(name: &str) -> bool {
    name.starts_with("__MACOSX/")
        || name
            .rsplit('/')
            .next()
            .map(|file| file.starts_with("._"))
            .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    pub(crate) fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, FileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, FileOptions::default()).unwrap();
                writer.write_all(bytes).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn keeps_only_image_entries() {
        let bytes = zip_of(&[
            ("photo1.jpg", b"a"),
            ("notes.txt", b"b"),
            ("sub/", b""),
            ("sub/photo2.png", b"c"),
        ]);
        let images = expand_archive(&SourceImage::new("batch.zip", bytes)).unwrap();
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["photo1.jpg", "sub/photo2.png"]);
        assert_eq!(images[1].bytes, b"c");
        assert_eq!(images[1].file_name(), "photo2.png");
    }

    #[test]
    fn extension_match_ignores_case() {
        let bytes = zip_of(&[("A.JPEG", b"x"), ("b.Gif", b"y"), ("c.bmp", b"z")]);
        let images = expand_archive(&SourceImage::new("batch.zip", bytes)).unwrap();
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn macos_resource_forks_are_skipped() {
        let bytes = zip_of(&[
            ("__MACOSX/._photo1.jpg", b"\x00\x05\x16\x07"),
            ("._photo2.jpg", b"\x00\x05\x16\x07"),
            ("photo1.jpg", b"real"),
        ]);
        let images = expand_archive(&SourceImage::new("batch.zip", bytes)).unwrap();
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["photo1.jpg"]);
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let err = expand_archive(&SourceImage::new("bad.zip", b"nope".to_vec())).unwrap_err();
        assert!(matches!(err, IntakeError::Archive(_)));
    }
}
