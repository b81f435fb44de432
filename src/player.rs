use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::PlaybackConfig;
use crate::constants::KEY_POLL_TIMEOUT;
use crate::engine::{FrameRead, FrameSource, Screen, ScreenEvent};
use crate::ffmpeg::VideoReader;
use crate::stop::StopSignal;
use crate::window::Window;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlaybackEnd {
    Exhausted,    // Source ran out of frames
    Escape,       // User pressed escape
    WindowClosed, // Window closed by the user or the system
    Interrupted,  // Stop signal raised
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PlaybackSummary {
    pub frames_shown: usize,
    pub end: PlaybackEnd,
}

/// Shows every frame of `source`, pausing `frame_delay` before each one.
pub fn play(
    source: &mut impl FrameSource,
    screen: &mut impl Screen,
    frame_delay: Duration,
    stop: &StopSignal,
) -> Result<PlaybackSummary> {
    let mut frames_shown = 0;
    let end = loop {
        if stop.is_stopped() {
            break PlaybackEnd::Interrupted;
        }

        let frame = match source
            .next_frame()
            .with_context(|| format!("failed to read frame {}", frames_shown))?
        {
            FrameRead::Frame(frame) => frame,
            FrameRead::EndOfStream => break PlaybackEnd::Exhausted,
        };

        if !stop.sleep(frame_delay) {
            break PlaybackEnd::Interrupted;
        }

        screen
            .present(&frame)
            .with_context(|| format!("failed to display frame {}", frames_shown))?;
        frames_shown += 1;

        match screen.poll(KEY_POLL_TIMEOUT) {
            ScreenEvent::Nothing => {}
            ScreenEvent::Escape => break PlaybackEnd::Escape,
            ScreenEvent::Closed => break PlaybackEnd::WindowClosed,
        }
    };

    debug!("playback ended after {} frames: {:?}", frames_shown, end);
    Ok(PlaybackSummary { frames_shown, end })
}

/// Opens `config.video_file` in a window sized to the video and plays it.
pub fn play_file(config: &PlaybackConfig, stop: &StopSignal) -> Result<PlaybackSummary> {
    let mut reader = VideoReader::open(&config.video_file)?;
    let (width, height) = reader.dimensions();
    info!("playing {} ({}x{})", config.video_file.display(), width, height);

    let mut window = Window::open(&config.window_title, width, height)?;
    play(&mut reader, &mut window, config.frame_delay, stop)
}

/// The post-playback pause. Returns `false` when cut short by a stop.
pub fn wait(post_wait: Duration, stop: &StopSignal) -> bool {
    if post_wait.is_zero() {
        return true;
    }
    info!("waiting {:?} before exit", post_wait);
    stop.sleep(post_wait)
}
