use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use image::DynamicImage;

use super::{CameraBackend, CameraDevice, CameraError, CameraResult};
use crate::photo::runtime_temp_dir;

const FFMPEG_COMMAND: &str = "ffmpeg";
const DEVICE_DIR: &str = "/dev";
const VIDEO_DEVICE_PREFIX: &str = "video";
const PREVIEW_FILE_NAME: &str = "camera_preview.png";
const PREVIEW_FPS: u32 = 5;
const FRAME_READ_ATTEMPTS: usize = 3;
const FRAME_READ_RETRY_DELAY: Duration = Duration::from_millis(60);

/// V4L2 camera driven through an `ffmpeg` child process.
#[derive(Debug, Clone)]
pub struct SystemCameraBackend {
    device_override: Option<PathBuf>,
    device_dir: PathBuf,
    preview_dir: PathBuf,
}

impl SystemCameraBackend {
    pub fn new(device_override: Option<PathBuf>) -> Self {
        Self {
            device_override,
            device_dir: PathBuf::from(DEVICE_DIR),
            preview_dir: runtime_temp_dir(),
        }
    }

    fn resolve_device(&self) -> CameraResult<PathBuf> {
        match &self.device_override {
            Some(device) if device.exists() => Ok(device.clone()),
            Some(device) => Err(CameraError::DeviceUnavailable {
                message: format!("configured device {} does not exist", device.display()),
            }),
            None => find_video_device(&self.device_dir),
        }
    }
}

impl CameraBackend for SystemCameraBackend {
    type Device = FfmpegCamera;

    fn acquire(&self) -> CameraResult<FfmpegCamera> {
        let device = self.resolve_device()?;
        tracing::debug!(device = %device.display(), "resolved camera device");
        Ok(FfmpegCamera {
            device,
            preview_path: self.preview_dir.join(PREVIEW_FILE_NAME),
            child: None,
        })
    }
}

#[derive(Debug)]
pub struct FfmpegCamera {
    device: PathBuf,
    preview_path: PathBuf,
    child: Option<Child>,
}

impl FfmpegCamera {
    pub fn device(&self) -> &Path {
        &self.device
    }

    fn ensure_running(&mut self) -> CameraResult<()> {
        let Some(child) = self.child.as_mut() else {
            return Err(CameraError::FrameUnavailable {
                message: "preview not started".to_string(),
            });
        };
        match child.try_wait() {
            Ok(None) => Ok(()),
            Ok(Some(status)) => Err(CameraError::CommandFailed {
                command: FFMPEG_COMMAND.to_string(),
                message: format!("preview exited with status: {status}"),
            }),
            Err(source) => Err(CameraError::CommandIo {
                command: FFMPEG_COMMAND.to_string(),
                source,
            }),
        }
    }
}

impl CameraDevice for FfmpegCamera {
    fn start_preview(&mut self) -> CameraResult<()> {
        if let Some(parent) = self.preview_path.parent() {
            fs::create_dir_all(parent).map_err(|source| CameraError::CommandIo {
                command: FFMPEG_COMMAND.to_string(),
                source,
            })?;
        }
        let _ = fs::remove_file(&self.preview_path);

        let args = preview_args(&self.device, &self.preview_path);
        let child = Command::new(FFMPEG_COMMAND)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CameraError::CommandIo {
                command: FFMPEG_COMMAND.to_string(),
                source,
            })?;
        tracing::info!(
            device = %self.device.display(),
            preview = %self.preview_path.display(),
            pid = child.id(),
            "camera preview started"
        );
        self.child = Some(child);
        Ok(())
    }

    fn current_frame(&mut self) -> CameraResult<DynamicImage> {
        self.ensure_running()?;

        // ffmpeg rewrites the preview in place; a read can land mid-write.
        let mut last_error = None;
        for attempt in 0..FRAME_READ_ATTEMPTS {
            if attempt > 0 {
                std::thread::sleep(FRAME_READ_RETRY_DELAY);
            }
            if !self.preview_path.exists() {
                last_error = Some(CameraError::FrameUnavailable {
                    message: "camera has not produced a frame yet".to_string(),
                });
                continue;
            }
            match image::open(&self.preview_path) {
                Ok(frame) => return Ok(frame),
                Err(err) => {
                    last_error = Some(CameraError::ImageReadFailed {
                        message: err.to_string(),
                    });
                }
            }
        }
        Err(last_error.unwrap_or_else(|| CameraError::FrameUnavailable {
            message: "no frame read attempts made".to_string(),
        }))
    }

    fn preview_frame_path(&self) -> Option<&Path> {
        self.child.as_ref().map(|_| self.preview_path.as_path())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!(device = %self.device.display(), "camera preview stopped");
        }
        match fs::remove_file(&self.preview_path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                path = %self.preview_path.display(),
                ?err,
                "failed to remove camera preview file"
            ),
        }
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        self.stop();
    }
}

fn preview_args(device: &Path, preview_path: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-f".to_string(),
        "v4l2".to_string(),
        "-i".to_string(),
        device.display().to_string(),
        "-vf".to_string(),
        format!("fps={PREVIEW_FPS}"),
        "-update".to_string(),
        "1".to_string(),
        "-y".to_string(),
        preview_path.display().to_string(),
    ]
}

/// Lowest-numbered `videoN` node in `device_dir`.
fn find_video_device(device_dir: &Path) -> CameraResult<PathBuf> {
    let entries = fs::read_dir(device_dir).map_err(|err| CameraError::DeviceUnavailable {
        message: format!("cannot list {}: {err}", device_dir.display()),
    })?;

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let index = video_device_index(name.to_str()?)?;
            Some((index, entry.path()))
        })
        .min_by_key(|(index, _)| *index)
        .map(|(_, path)| path)
        .ok_or_else(|| CameraError::DeviceUnavailable {
            message: format!("no video device under {}", device_dir.display()),
        })
}

fn video_device_index(name: &str) -> Option<u32> {
    name.strip_prefix(VIDEO_DEVICE_PREFIX)?.parse::<u32>().ok()
}
