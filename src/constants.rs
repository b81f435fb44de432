use std::time::Duration;

pub const FPS: u32 = 5;                                          // Assembled video frame rate
pub const IMAGE_SUFFIX: &str = ".png";                           // Exact, case-sensitive suffix
pub const KEY_POLL_TIMEOUT: Duration = Duration::from_millis(1); // Input poll per shown frame
pub const DEFAULT_WINDOW_TITLE: &str = "kmeans";

pub const PLOT_WIDTH: u32 = 672;                                 // 7 inches at 96 dpi
pub const PLOT_HEIGHT: u32 = 576;                                // 6 inches at 96 dpi
pub const PLOT_MARGIN: u32 = 24;                                 // Blank border (pixels)
pub const PLOT_PADDING: f64 = 0.05;                              // Data span added per side
pub const PLOT_GRID_LINES: usize = 10;                           // Grid divisions per axis
pub const PLOT_FILE_PREFIX: &str = "points_";
pub const POINT_RADIUS: i32 = 3;
pub const CENTER_RADIUS: i32 = 7;
