pub mod dataset;
pub mod kmeans;
pub mod plot;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rand::Rng;
use tracing::{debug, info};

use crate::config::{ClusterConfig, DataSource};
use crate::constants::PLOT_FILE_PREFIX;
use crate::stop::StopSignal;

use self::dataset::{random_points, read_points};
use self::kmeans::KMeans;
use self::plot::{Bounds, render};

/// File name of the frame showing iteration `iteration`, sortable by name.
pub fn frame_name(iteration: usize) -> String {
    format!("{}{:04}.png", PLOT_FILE_PREFIX, iteration)
}

/// Clears the image folder and fills it with one plot per k-means iteration.
/// Returns the written frame paths in iteration order.
pub fn generate(
    config: &ClusterConfig,
    rng: &mut impl Rng,
    stop: &StopSignal,
) -> Result<Vec<PathBuf>> {
    let points = match &config.source {
        DataSource::Random { points } => random_points(*points, rng),
        DataSource::File(path) => read_points(path)?,
    };
    info!("clustering {} points into {} groups", points.len(), config.centers);
    // Everything that can reject the run is checked before the folder is wiped
    if config.centers > points.len() {
        bail!("cannot form {} clusters from {} points", config.centers, points.len());
    }
    let kmeans = KMeans::new(config.threshold, config.max_iterations)?;

    let folder = &config.img_folder;
    if folder.exists() {
        fs::remove_dir_all(folder)
            .with_context(|| format!("failed to clear {}", folder.display()))?;
    }
    fs::create_dir_all(folder).with_context(|| format!("failed to create {}", folder.display()))?;

    let bounds = Bounds::around(&points);
    let mut frames = Vec::new();
    kmeans.partition(&points, config.centers, rng, |clusters, iteration| {
        if stop.is_stopped() {
            bail!("generation interrupted after {} frames", frames.len());
        }
        let path = folder.join(frame_name(iteration));
        render(clusters, &bounds, &path)?;
        debug!("wrote {}", path.display());
        frames.push(path);
        Ok(())
    })?;

    info!("wrote {} frames to {}", frames.len(), folder.display());
    Ok(frames)
}
