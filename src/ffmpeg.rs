use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::engine::{FrameRead, FrameSource};
use crate::frame::Frame;

/// Streams RGB frames into an ffmpeg child that stores them uncompressed.
pub struct VideoWriter {
    process: Child,
    stdin: Option<ChildStdin>,
    path: PathBuf,
    width: u32,
    height: u32,
    frames: usize,
}

impl VideoWriter {
    pub fn create(path: &Path, width: u32, height: u32, fps: u32) -> Result<Self> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .args(["-hide_banner", "-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgb24"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &fps.to_string()])
            .args(["-i", "-"])
            .args(["-c:v", "rawvideo"])
            .args(["-pix_fmt", "bgr24"])
            .arg(path)
            .spawn()
            .context("failed to start ffmpeg (is it installed and on PATH?)")?;
        let stdin = process.stdin.take().context("ffmpeg stdin missing")?;
        debug!("ffmpeg writing {}x{} @ {} fps to {}", width, height, fps, path.display());

        Ok(Self {
            process,
            stdin: Some(stdin),
            path: path.to_path_buf(),
            width,
            height,
            frames: 0,
        })
    }

    pub fn write(&mut self, frame: &Frame) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            bail!(
                "frame is {}x{} but the video is {}x{}",
                frame.width,
                frame.height,
                self.width,
                self.height
            );
        }
        let stdin = self.stdin.as_mut().context("video writer already finished")?;
        stdin
            .write_all(&frame.data)
            .with_context(|| format!("failed to pipe frame {} to ffmpeg", self.frames))?;
        self.frames += 1;
        Ok(())
    }

    /// Closes the pipe and waits for ffmpeg to finalise the container.
    pub fn finish(mut self) -> Result<usize> {
        self.stdin = None;
        let status = self.process.wait().context("failed to wait for ffmpeg")?;
        if !status.success() {
            bail!("ffmpeg exited with {} while writing {}", status, self.path.display());
        }
        Ok(self.frames)
    }
}

impl Drop for VideoWriter {
    fn drop(&mut self) {
        // Close stdin pipe and reap ffmpeg; a finished writer has already been waited on
        self.stdin = None;
        let _ = self.process.wait();
    }
}

/// Decodes a video back into RGB frames through an ffmpeg child.
pub struct VideoReader {
    process: Child,
    stdout: BufReader<ChildStdout>,
    width: u32,
    height: u32,
    frames: usize,
    finished: bool,
}

impl VideoReader {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("video file {} does not exist", path.display());
        }
        let (width, height) = probe_dimensions(path)?;

        let mut process = Command::new("ffmpeg")
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .args(["-hide_banner", "-loglevel", "error"])
            .arg("-i")
            .arg(path)
            .args(["-f", "rawvideo"])
            .args(["-pix_fmt", "rgb24"])
            .arg("pipe:1")
            .spawn()
            .context("failed to start ffmpeg (is it installed and on PATH?)")?;
        let stdout = process.stdout.take().context("ffmpeg stdout missing")?;
        debug!("ffmpeg decoding {} ({}x{})", path.display(), width, height);

        Ok(Self {
            process,
            stdout: BufReader::new(stdout),
            width,
            height,
            frames: 0,
            finished: false,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FrameSource for VideoReader {
    fn next_frame(&mut self) -> Result<FrameRead> {
        if self.finished {
            return Ok(FrameRead::EndOfStream);
        }
        let mut data = vec![0u8; Frame::byte_len(self.width, self.height)];
        let filled = read_full(&mut self.stdout, &mut data)
            .with_context(|| format!("failed to read frame {} from ffmpeg", self.frames))?;

        if filled == data.len() {
            self.frames += 1;
            return Ok(FrameRead::Frame(Frame::new(self.width, self.height, data)?));
        }

        self.finished = true;
        let status = self.process.wait().context("failed to wait for ffmpeg")?;
        if filled != 0 {
            bail!("truncated frame {} ({} of {} bytes)", self.frames, filled, data.len());
        }
        if !status.success() {
            bail!("ffmpeg exited with {} after {} frames", status, self.frames);
        }
        Ok(FrameRead::EndOfStream)
    }
}

impl Drop for VideoReader {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.process.kill();
        }
        let _ = self.process.wait();
    }
}

/// Reads until `buf` is full or the stream ends; returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    let output = Command::new("ffprobe")
        .args(["-v", "error"])
        .args(["-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height"])
        .args(["-of", "csv=s=x:p=0"])
        .arg(path)
        .output()
        .context("failed to run ffprobe (is it installed and on PATH?)")?;
    if !output.status.success() {
        bail!(
            "ffprobe failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    parse_dimensions(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("no video stream dimensions for {}", path.display()))
}

/// Parses ffprobe's `WIDTHxHEIGHT` line.
fn parse_dimensions(text: &str) -> Result<(u32, u32)> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let Some((w, h)) = line.split_once('x') else {
        bail!("unexpected ffprobe output {:?}", line);
    };
    let width: u32 = w.trim().parse().with_context(|| format!("bad width {:?}", w))?;
    let height: u32 = h.trim().parse().with_context(|| format!("bad height {:?}", h))?;
    if width == 0 || height == 0 {
        bail!("video has empty dimensions {}x{}", width, height);
    }
    Ok((width, height))
}
