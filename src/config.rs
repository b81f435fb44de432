use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use thiserror::Error;

use crate::constants::DEFAULT_WINDOW_TITLE;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{name} must be a positive number of seconds, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} is too large to use as a duration: {value}")]
    TooLarge { name: &'static str, value: f64 },
    #[error("{name} must be at least {min}, got {value}")]
    TooSmall { name: &'static str, min: usize, value: usize },
    #[error("THRESHOLD must lie strictly between 0 and 1, got {0}")]
    Threshold(f64),
    #[error("AMOUNT_OF_CENTERS ({centers}) exceeds AMOUNT_OF_POINTS ({points})")]
    MoreCentersThanPoints { centers: usize, points: usize },
}

/// Slideshow settings, each readable from a flag or its environment variable.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Folder scanned for *.png images
    #[arg(long, env = "IMG_FOLDER", global = true)]
    pub img_folder: Option<PathBuf>,

    /// Video file written by assembly and read by playback
    #[arg(long, env = "VIDEO_FILE", global = true)]
    pub video_file: Option<PathBuf>,

    /// Pause before each displayed frame, in seconds
    #[arg(long, env = "TIME_FRAME", global = true)]
    pub time_frame: Option<f64>,

    /// Pause after playback ends, in seconds
    #[arg(long, env = "TIME_WAIT", global = true)]
    pub time_wait: Option<u64>,

    /// Title of the playback window
    #[arg(long, env = "WINDOW_TITLE", global = true, default_value = DEFAULT_WINDOW_TITLE)]
    pub window_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleConfig {
    pub img_folder: PathBuf,
    pub video_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub video_file: PathBuf,
    pub frame_delay: Duration,
    pub post_wait: Duration,
    pub window_title: String,
}

impl ConfigArgs {
    pub fn img_folder(&self) -> Result<PathBuf, ConfigError> {
        required_path("IMG_FOLDER", self.img_folder.as_deref())
    }

    pub fn assemble(&self) -> Result<AssembleConfig, ConfigError> {
        Ok(AssembleConfig {
            img_folder: self.img_folder()?,
            video_file: required_path("VIDEO_FILE", self.video_file.as_deref())?,
        })
    }

    pub fn playback(&self) -> Result<PlaybackConfig, ConfigError> {
        let video_file = required_path("VIDEO_FILE", self.video_file.as_deref())?;
        let time_frame = self.time_frame.ok_or(ConfigError::Missing("TIME_FRAME"))?;
        if !time_frame.is_finite() || time_frame <= 0.0 {
            return Err(ConfigError::NotPositive { name: "TIME_FRAME", value: time_frame });
        }
        let frame_delay = Duration::try_from_secs_f64(time_frame)
            .map_err(|_| ConfigError::TooLarge { name: "TIME_FRAME", value: time_frame })?;
        let time_wait = self.time_wait.ok_or(ConfigError::Missing("TIME_WAIT"))?;

        Ok(PlaybackConfig {
            video_file,
            frame_delay,
            post_wait: Duration::from_secs(time_wait),
            window_title: self.window_title.clone(),
        })
    }
}

/// Settings of the k-means frame generator.
#[derive(Debug, Clone, Default, Args)]
pub struct ClusterArgs {
    /// Tab-separated data file with `len1` and `wid1` columns; random points when unset
    #[arg(long, env = "DATA_PATH")]
    pub data_path: Option<PathBuf>,

    /// Number of random points to cluster
    #[arg(long, env = "AMOUNT_OF_POINTS")]
    pub amount_of_points: Option<usize>,

    /// Number of clusters
    #[arg(long, env = "AMOUNT_OF_CENTERS")]
    pub amount_of_centers: Option<usize>,

    /// Stop once fewer than this fraction of points change cluster
    #[arg(long, env = "THRESHOLD")]
    pub threshold: Option<f64>,

    /// Maximum number of iterations
    #[arg(long, env = "COUNT_ITER")]
    pub count_iter: Option<usize>,

    /// Only generate the frames, skip assembling and playing them
    #[arg(long)]
    pub no_show: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Random { points: usize },
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub img_folder: PathBuf,
    pub source: DataSource,
    pub centers: usize,
    pub threshold: f64,
    pub max_iterations: usize,
}

impl ClusterArgs {
    pub fn cluster(&self, img_folder: PathBuf) -> Result<ClusterConfig, ConfigError> {
        let centers = self.amount_of_centers.ok_or(ConfigError::Missing("AMOUNT_OF_CENTERS"))?;
        if centers < 1 {
            return Err(ConfigError::TooSmall { name: "AMOUNT_OF_CENTERS", min: 1, value: centers });
        }

        let threshold = self.threshold.ok_or(ConfigError::Missing("THRESHOLD"))?;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ConfigError::Threshold(threshold));
        }

        let max_iterations = self.count_iter.ok_or(ConfigError::Missing("COUNT_ITER"))?;
        if max_iterations < 1 {
            return Err(ConfigError::TooSmall { name: "COUNT_ITER", min: 1, value: max_iterations });
        }

        let source = match self.data_path.as_deref().filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => DataSource::File(path.to_path_buf()),
            None => {
                let points = self.amount_of_points.ok_or(ConfigError::Missing("AMOUNT_OF_POINTS"))?;
                if points < centers {
                    return Err(ConfigError::MoreCentersThanPoints { centers, points });
                }
                DataSource::Random { points }
            }
        };

        Ok(ClusterConfig { img_folder, source, centers, threshold, max_iterations })
    }
}

fn required_path(name: &'static str, value: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = value.ok_or(ConfigError::Missing(name))?;
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(path.to_path_buf())
}
