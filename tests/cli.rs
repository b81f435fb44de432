use assert_cmd::Command;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SETTINGS: [&str; 10] = [
    "IMG_FOLDER",
    "VIDEO_FILE",
    "TIME_FRAME",
    "TIME_WAIT",
    "WINDOW_TITLE",
    "DATA_PATH",
    "AMOUNT_OF_POINTS",
    "AMOUNT_OF_CENTERS",
    "THRESHOLD",
    "COUNT_ITER",
];

fn ffmpeg_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        std::process::Command::new(tool)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

/// The binary run from `dir` with none of its settings inherited.
fn slideshow(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kmeans-slideshow").expect("binary built");
    cmd.current_dir(dir);
    for name in SETTINGS {
        cmd.env_remove(name);
    }
    cmd
}

fn write_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(color))
        .save(path)
        .expect("write png");
}

fn decode_rgb(video: &Path) -> Vec<u8> {
    let output = std::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-i"])
        .arg(video)
        .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
        .output()
        .expect("run ffmpeg");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    output.stdout
}

fn combined_output(output: &std::process::Output) -> String {
    format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn missing_setting_is_reported_by_name() {
    let tmp = TempDir::new().expect("tempdir");
    let output = slideshow(tmp.path())
        .arg("assemble")
        .env("VIDEO_FILE", "out.avi")
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("IMG_FOLDER is not set"));
}

#[test]
fn non_positive_frame_time_is_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    let output = slideshow(tmp.path())
        .arg("play")
        .env("VIDEO_FILE", "out.avi")
        .env("TIME_FRAME", "0")
        .env("TIME_WAIT", "0")
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("TIME_FRAME must be a positive number"));
}

#[test]
fn empty_image_folder_fails_without_writing_a_video() {
    let tmp = TempDir::new().expect("tempdir");
    let images = tmp.path().join("images");
    fs::create_dir(&images).expect("mkdir");
    fs::write(images.join("notes.txt"), "not an image").expect("write");
    let video = tmp.path().join("out.avi");

    let output = slideshow(tmp.path())
        .arg("assemble")
        .env("IMG_FOLDER", &images)
        .env("VIDEO_FILE", &video)
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("no *.png images"));
    assert!(!video.exists());
}

#[test]
fn settings_are_read_from_dotenv_file() {
    let tmp = TempDir::new().expect("tempdir");
    fs::create_dir(tmp.path().join("images")).expect("mkdir");
    fs::write(tmp.path().join(".env"), "IMG_FOLDER=images\nVIDEO_FILE=out.avi\n")
        .expect("write .env");

    let output = slideshow(tmp.path()).arg("assemble").output().expect("run");
    assert!(!output.status.success());
    // The folder from .env was found; it simply has no images
    assert!(combined_output(&output).contains("no *.png images"));
}

#[test]
fn missing_video_fails_playback() {
    let tmp = TempDir::new().expect("tempdir");
    let output = slideshow(tmp.path())
        .arg("play")
        .env("VIDEO_FILE", tmp.path().join("absent.avi"))
        .env("TIME_FRAME", "0.01")
        .env("TIME_WAIT", "0")
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("does not exist"));
}

#[test]
fn assembles_png_frames_into_video() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg/ffprobe not found");
        return;
    }
    let tmp = TempDir::new().expect("tempdir");
    let images = tmp.path().join("images");
    fs::create_dir(&images).expect("mkdir");
    write_png(&images.join("a.png"), 2, 2, [255, 0, 0]);
    write_png(&images.join("b.png"), 2, 2, [255, 0, 0]);
    fs::write(images.join("readme.txt"), "ignored").expect("write");
    let video = tmp.path().join("out.avi");

    slideshow(tmp.path())
        .arg("assemble")
        .env("IMG_FOLDER", &images)
        .env("VIDEO_FILE", &video)
        .assert()
        .success();

    let pixels = decode_rgb(&video);
    assert_eq!(pixels.len(), 2 * 2 * 2 * 3, "expected exactly two 2x2 frames");
    assert!(pixels.chunks_exact(3).all(|px| px == [255, 0, 0]));
}

#[test]
fn frames_follow_file_name_order() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg/ffprobe not found");
        return;
    }
    let tmp = TempDir::new().expect("tempdir");
    let images = tmp.path().join("images");
    fs::create_dir(&images).expect("mkdir");
    write_png(&images.join("3.png"), 4, 2, [0, 0, 255]);
    write_png(&images.join("1.png"), 4, 2, [255, 0, 0]);
    write_png(&images.join("2.png"), 4, 2, [0, 255, 0]);
    let video = tmp.path().join("out.mkv");

    slideshow(tmp.path())
        .args(["assemble", "--img-folder"])
        .arg(&images)
        .arg("--video-file")
        .arg(&video)
        .assert()
        .success();

    let pixels = decode_rgb(&video);
    let frame_len = 4 * 2 * 3;
    assert_eq!(pixels.len(), 3 * frame_len);
    let firsts: Vec<&[u8]> = pixels.chunks_exact(frame_len).map(|f| &f[..3]).collect();
    assert_eq!(firsts, [&[255u8, 0, 0][..], &[0, 255, 0], &[0, 0, 255]]);
}

#[test]
fn mismatched_image_size_fails_assembly() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg/ffprobe not found");
        return;
    }
    let tmp = TempDir::new().expect("tempdir");
    let images = tmp.path().join("images");
    fs::create_dir(&images).expect("mkdir");
    write_png(&images.join("a.png"), 2, 2, [0, 0, 0]);
    write_png(&images.join("b.png"), 3, 3, [0, 0, 0]);

    let output = slideshow(tmp.path())
        .arg("assemble")
        .env("IMG_FOLDER", &images)
        .env("VIDEO_FILE", tmp.path().join("out.avi"))
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("b.png"));
}

#[test]
fn cluster_without_show_generates_ordered_frames() {
    let tmp = TempDir::new().expect("tempdir");
    let images = tmp.path().join("frames");

    slideshow(tmp.path())
        .args(["cluster", "--no-show"])
        .env("IMG_FOLDER", &images)
        .env("AMOUNT_OF_POINTS", "50")
        .env("AMOUNT_OF_CENTERS", "3")
        .env("THRESHOLD", "0.05")
        .env("COUNT_ITER", "3")
        .assert()
        .success();

    let mut names: Vec<String> = fs::read_dir(&images)
        .expect("read frames")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert!(!names.is_empty() && names.len() <= 3);
    assert_eq!(names[0], "points_0000.png");
}

#[test]
fn failed_playback_still_waits_before_exiting() {
    let tmp = TempDir::new().expect("tempdir");
    let started = std::time::Instant::now();
    let output = slideshow(tmp.path())
        .arg("play")
        .env("VIDEO_FILE", tmp.path().join("absent.avi"))
        .env("TIME_FRAME", "0.01")
        .env("TIME_WAIT", "1")
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(started.elapsed() >= std::time::Duration::from_secs(1));
    assert!(combined_output(&output).contains("does not exist"));
}
