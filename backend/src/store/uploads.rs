use super::StoreError;
use image::ImageFormat;
use log::info;
use md5::Context;
use std::path::{Path, PathBuf};

/// Public prefix under which stored uploads are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Directory holding certificate images, each named by the MD5 of its bytes.
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(UploadDir { root })
    }

    /// Writes `bytes` and returns the public path of the stored file.
    ///
    /// The extension comes from the detected image format so the name is
    /// stable for identical content whatever it was uploaded as.
    pub async fn save(&self, format: ImageFormat, bytes: &[u8]) -> Result<String, StoreError> {
        let mut hasher = Context::new();
        hasher.consume(bytes);
        let extension = format.extensions_str().first().copied().unwrap_or("bin");
        let name = format!("{:x}.{}", hasher.finalize(), extension);

        let path = self.root.join(&name);
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, bytes).await?;
            info!("Stored upload {} ({} bytes)", name, bytes.len());
        }
        Ok(format!("{}/{}", UPLOADS_ROUTE, name))
    }

    /// Maps a served file name back to a path inside the directory.
    ///
    /// Names that could leave the directory resolve to `None`.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let candidate = Path::new(name);
        let mut components = candidate.components();
        match (components.next(), components.next()) {
            (Some(std::path::Component::Normal(_)), None) => Some(self.root.join(candidate)),
            _ => None,
        }
    }
}
