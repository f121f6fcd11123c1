//! Optional word-cloud images for the insights view

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Available { path: PathBuf, bytes: u64 },
    Missing,
}

/// An optional image with the caption it is displayed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualAsset {
    pub caption: &'static str,
    pub status: AssetStatus,
}

impl VisualAsset {
    /// Checks for the file; anything but a readable regular file counts as missing.
    pub fn locate(caption: &'static str, path: &Path) -> Self {
        let status = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => AssetStatus::Available {
                path: path.to_path_buf(),
                bytes: meta.len(),
            },
            Ok(_) => {
                log::warn!("{caption} path {} is not a file", path.display());
                AssetStatus::Missing
            }
            Err(e) => {
                log::debug!("{caption} unavailable at {}: {e}", path.display());
                AssetStatus::Missing
            }
        };
        Self { caption, status }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, AssetStatus::Available { .. })
    }

    /// One display line: the image location, or the placeholder notice
    pub fn display_line(&self) -> String {
        match &self.status {
            AssetStatus::Available { path, bytes } => {
                format!("🖼️  {}: {} ({} bytes)", self.caption, path.display(), bytes)
            }
            AssetStatus::Missing => format!("ℹ️  {} not available", self.caption),
        }
    }
}
