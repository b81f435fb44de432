use std::time::Duration;

use anyhow::Result;

use crate::frame::Frame;

/// Outcome of asking a source for its next frame.
#[derive(Debug)]
pub enum FrameRead {
    Frame(Frame),
    EndOfStream,
}

/// Anything that yields decoded frames in playback order.
pub trait FrameSource {
    /// `Ok(EndOfStream)` only for a clean end; decode failures are errors.
    fn next_frame(&mut self) -> Result<FrameRead>;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScreenEvent {
    Nothing,
    Escape,
    Closed,
}

/// Display surface for playback.
pub trait Screen {
    fn present(&mut self, frame: &Frame) -> Result<()>;
    fn poll(&mut self, timeout: Duration) -> ScreenEvent;
}
