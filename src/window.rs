use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use raylib::prelude::*;

use crate::engine::{Screen, ScreenEvent};
use crate::frame::Frame;

/// raylib window sized to the video, showing one streaming texture.
pub struct Window {
    rl: RaylibHandle,
    thread: RaylibThread,
    texture: Texture2D,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Window {
    pub fn open(title: &str, width: u32, height: u32) -> Result<Self> {
        // raylib panics when no display or GL context is available
        let (mut rl, thread) = catch_init(|| {
            raylib::init()
                .size(width as i32, height as i32)
                .title(title)
                .build()
        })
        .map_err(|reason| anyhow!("failed to open playback window: {}", reason))?;
        rl.set_trace_log(TraceLogLevel::LOG_ERROR);
        // Escape is handled by the playback loop, not by raylib closing the window
        rl.set_exit_key(None);

        // gen_image_color yields R8G8B8A8, matching Frame::write_rgba
        let blank = Image::gen_image_color(width as i32, height as i32, Color::BLACK);
        let texture = rl
            .load_texture_from_image(&thread, &blank)
            .map_err(|e| anyhow!("failed to create playback texture: {}", e))?;

        Ok(Self {
            rl,
            thread,
            texture,
            width,
            height,
            rgba: Vec::new(),
        })
    }
}

impl Screen for Window {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            bail!(
                "frame is {}x{} but the window is {}x{}",
                frame.width,
                frame.height,
                self.width,
                self.height
            );
        }
        frame.write_rgba(&mut self.rgba);
        self.texture
            .update_texture(&self.rgba)
            .map_err(|e| anyhow!("failed to upload frame: {}", e))?;

        // Ending the draw also pumps window events
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);
        d.draw_texture(&self.texture, 0, 0, Color::WHITE);
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> ScreenEvent {
        std::thread::sleep(timeout);
        if self.rl.window_should_close() {
            ScreenEvent::Closed
        } else if self.rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            ScreenEvent::Escape
        } else {
            ScreenEvent::Nothing
        }
    }
}

/// Runs a native initialiser, turning a panic into its message.
fn catch_init<T>(init: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(init)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialiser_panic_becomes_an_error() {
        let reason = catch_init(|| -> u32 { panic!("no display") }).unwrap_err();
        assert_eq!(reason, "no display");

        let reason = catch_init(|| -> u32 { panic!("{} attempts", 3) }).unwrap_err();
        assert_eq!(reason, "3 attempts");
    }

    #[test]
    fn initialiser_value_is_passed_through() {
        assert_eq!(catch_init(|| 7), Ok(7));
    }
}
