use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::config::AssembleConfig;
use crate::constants::FPS;
use crate::ffmpeg::VideoWriter;
use crate::image_set::{list_images, load_frame};
use crate::stop::StopSignal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySummary {
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

/// Writes every image of the folder, in name order, into the video file.
/// The first image fixes the video dimensions.
pub fn assemble(config: &AssembleConfig, stop: &StopSignal) -> Result<AssemblySummary> {
    let image_paths = list_images(&config.img_folder)?;
    info!("assembling {} images from {}", image_paths.len(), config.img_folder.display());

    let first = load_frame(&image_paths[0])?;
    let (width, height) = first.dimensions();
    let mut writer = VideoWriter::create(&config.video_file, width, height, FPS)?;
    writer.write(&first)?;

    for path in &image_paths[1..] {
        if stop.is_stopped() {
            bail!("assembly interrupted, {} is incomplete", config.video_file.display());
        }
        debug!("adding {}", path.display());
        let frame = load_frame(path)?;
        writer
            .write(&frame)
            .with_context(|| format!("failed to add {}", path.display()))?;
    }

    let frames = writer.finish()?;
    let summary = AssemblySummary {
        frames,
        width,
        height,
        output: config.video_file.clone(),
    };
    info!(
        "wrote {} frames ({}x{} @ {} fps) to {}",
        summary.frames,
        summary.width,
        summary.height,
        FPS,
        summary.output.display()
    );
    Ok(summary)
}
