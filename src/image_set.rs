use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::constants::IMAGE_SUFFIX;
use crate::frame::Frame;

// --- Helper: List and Sort Image Paths ---
pub fn list_images(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("failed to read image folder {}", dir_path.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", dir_path.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        // Names that are not valid UTF-8 cannot match the suffix
        let is_image = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.ends_with(IMAGE_SUFFIX));
        if is_image {
            paths.push(path);
        } else {
            debug!("skipping {}", path.display());
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if paths.is_empty() {
        bail!("no *{} images in {}", IMAGE_SUFFIX, dir_path.display());
    }
    Ok(paths)
}

// --- Decode one image into an RGB frame ---
pub fn load_frame(image_path: &Path) -> Result<Frame> {
    let image = image::open(image_path)
        .with_context(|| format!("failed to decode image {}", image_path.display()))?;
    Ok(Frame::from(image.to_rgb8()))
}
