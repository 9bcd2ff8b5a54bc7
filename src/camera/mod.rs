use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

use crate::photo::{PhotoError, PhotoLibrary};

mod state;
mod v4l;

pub use state::{CameraEvent, CameraState, CameraStateMachine};
pub use v4l::{FfmpegCamera, SystemCameraBackend};

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("no camera device available: {message}")]
    DeviceUnavailable { message: String },
    #[error("command io error: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },
    #[error("camera frame unavailable: {message}")]
    FrameUnavailable { message: String },
    #[error("failed to read camera frame: {message}")]
    ImageReadFailed { message: String },
    #[error("invalid camera transition: from {from:?} using event {event:?}")]
    InvalidTransition {
        from: CameraState,
        event: CameraEvent,
    },
    #[error(transparent)]
    Photo(#[from] PhotoError),
}

pub type CameraResult<T> = std::result::Result<T, CameraError>;

pub trait CameraBackend {
    type Device: CameraDevice;

    fn acquire(&self) -> CameraResult<Self::Device>;
}

pub trait CameraDevice {
    fn start_preview(&mut self) -> CameraResult<()>;
    fn current_frame(&mut self) -> CameraResult<DynamicImage>;
    /// File the live preview is rendered to, when the device exposes one.
    fn preview_frame_path(&self) -> Option<&Path>;
    fn stop(&mut self);
}

/// Scoped camera acquisition.
///
/// The device is stopped exactly once: after a capture, on cancel, when a
/// capture fails, or when the session is dropped.
pub struct CameraSession<D: CameraDevice> {
    device: D,
    machine: CameraStateMachine,
    released: bool,
}

impl<D: CameraDevice> CameraSession<D> {
    pub fn open<B>(backend: &B) -> CameraResult<Self>
    where
        B: CameraBackend<Device = D>,
    {
        let device = backend.acquire()?;
        tracing::info!("camera acquired");
        Ok(Self {
            device,
            machine: CameraStateMachine::new(),
            released: false,
        })
    }

    pub fn state(&self) -> CameraState {
        self.machine.state()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn preview_frame_path(&self) -> Option<&Path> {
        if self.released {
            return None;
        }
        self.device.preview_frame_path()
    }

    pub fn start_preview(&mut self) -> CameraResult<()> {
        self.machine.transition(CameraEvent::StartPreview)?;
        if let Err(err) = self.device.start_preview() {
            tracing::warn!(?err, "camera preview failed to start");
            self.finish(CameraEvent::Cancel);
            return Err(err);
        }
        Ok(())
    }

    pub fn capture(&mut self, library: &PhotoLibrary) -> CameraResult<PathBuf> {
        if !self.machine.can_transition(CameraEvent::Capture) {
            return Err(CameraError::InvalidTransition {
                from: self.machine.state(),
                event: CameraEvent::Capture,
            });
        }

        let saved = self
            .device
            .current_frame()
            .and_then(|frame| library.save_frame(&frame).map_err(CameraError::from));
        match saved {
            Ok(path) => {
                self.finish(CameraEvent::Capture);
                Ok(path)
            }
            Err(err) => {
                tracing::warn!(?err, "camera capture failed");
                self.finish(CameraEvent::Cancel);
                Err(err)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.finish(CameraEvent::Cancel);
    }

    /// Stops the device whatever state the session is in.
    pub fn release(&mut self) {
        self.finish(CameraEvent::Cancel);
    }

    fn finish(&mut self, event: CameraEvent) {
        if self.machine.can_transition(event) {
            let _ = self.machine.transition(event);
        }
        if !self.released {
            self.device.stop();
            self.released = true;
            tracing::info!(outcome = ?self.machine.state(), "camera released");
        }
        if self.machine.can_transition(CameraEvent::Release) {
            let _ = self.machine.transition(CameraEvent::Release);
        }
    }
}

impl<D: CameraDevice> Drop for CameraSession<D> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Runs a full capture: preview, then `decide` chooses capture (`true`) or
/// cancel (`false`).
pub fn capture_from_camera<B, F>(
    backend: &B,
    library: &PhotoLibrary,
    decide: F,
) -> CameraResult<Option<PathBuf>>
where
    B: CameraBackend,
    F: FnOnce(&CameraSession<B::Device>) -> bool,
{
    let mut session = CameraSession::open(backend)?;
    session.start_preview()?;
    if decide(&session) {
        session.capture(library).map(Some)
    } else {
        session.cancel();
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<&'static str>>>;

    struct FakeDevice {
        calls: CallLog,
        fail_preview: bool,
        fail_frame: bool,
    }

    impl CameraDevice for FakeDevice {
        fn start_preview(&mut self) -> CameraResult<()> {
            self.calls.borrow_mut().push("start_preview");
            if self.fail_preview {
                return Err(CameraError::CommandFailed {
                    command: "ffmpeg".to_string(),
                    message: "simulated preview failure".to_string(),
                });
            }
            Ok(())
        }

        fn current_frame(&mut self) -> CameraResult<DynamicImage> {
            self.calls.borrow_mut().push("current_frame");
            if self.fail_frame {
                return Err(CameraError::FrameUnavailable {
                    message: "simulated missing frame".to_string(),
                });
            }
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                2,
                2,
                Rgb([0, 128, 0]),
            )))
        }

        fn preview_frame_path(&self) -> Option<&Path> {
            None
        }

        fn stop(&mut self) {
            self.calls.borrow_mut().push("stop");
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        calls: CallLog,
        unavailable: bool,
        fail_preview: bool,
        fail_frame: bool,
    }

    impl FakeBackend {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }

        fn stop_count(&self) -> usize {
            self.calls().iter().filter(|call| **call == "stop").count()
        }
    }

    impl CameraBackend for FakeBackend {
        type Device = FakeDevice;

        fn acquire(&self) -> CameraResult<FakeDevice> {
            self.calls.borrow_mut().push("acquire");
            if self.unavailable {
                return Err(CameraError::DeviceUnavailable {
                    message: "no /dev/video* device".to_string(),
                });
            }
            Ok(FakeDevice {
                calls: self.calls.clone(),
                fail_preview: self.fail_preview,
                fail_frame: self.fail_frame,
            })
        }
    }

    fn temp_library(label: &str) -> PhotoLibrary {
        let dir = std::env::temp_dir().join(format!(
            "catalogue-camera-{label}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        PhotoLibrary::with_dir(dir)
    }

    #[test]
    fn capture_saves_png_and_releases_camera() {
        let backend = FakeBackend::default();
        let library = temp_library("capture");

        let path = capture_from_camera(&backend, &library, |session| {
            assert_eq!(session.state(), CameraState::Previewing);
            true
        })
        .expect("capture should succeed")
        .expect("capture should produce a path");

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("png"));
        assert_eq!(
            backend.calls(),
            vec!["acquire", "start_preview", "current_frame", "stop"]
        );
    }

    #[test]
    fn cancel_releases_camera_without_writing() {
        let backend = FakeBackend::default();
        let library = temp_library("cancel");

        let result =
            capture_from_camera(&backend, &library, |_| false).expect("cancel is not an error");

        assert_eq!(result, None);
        assert_eq!(backend.calls(), vec!["acquire", "start_preview", "stop"]);
        assert!(!library.dir().exists());
    }

    #[test]
    fn unavailable_device_reports_error_without_stopping_anything() {
        let backend = FakeBackend {
            unavailable: true,
            ..FakeBackend::default()
        };
        let library = temp_library("unavailable");

        let err = capture_from_camera(&backend, &library, |_| true)
            .expect_err("missing camera should be reported");
        assert!(matches!(err, CameraError::DeviceUnavailable { .. }));
        assert_eq!(backend.calls(), vec!["acquire"]);
    }

    #[test]
    fn preview_failure_releases_acquired_device() {
        let backend = FakeBackend {
            fail_preview: true,
            ..FakeBackend::default()
        };
        let library = temp_library("preview-failure");

        let err = capture_from_camera(&backend, &library, |_| true)
            .expect_err("preview failure should bubble");
        assert!(matches!(err, CameraError::CommandFailed { .. }));
        assert_eq!(backend.calls(), vec!["acquire", "start_preview", "stop"]);
    }

    #[test]
    fn frame_failure_releases_camera_once() {
        let backend = FakeBackend {
            fail_frame: true,
            ..FakeBackend::default()
        };
        let library = temp_library("frame-failure");

        let mut session = CameraSession::open(&backend).expect("camera should open");
        session.start_preview().expect("preview should start");
        let err = session
            .capture(&library)
            .expect_err("frame failure should bubble");
        assert!(matches!(err, CameraError::FrameUnavailable { .. }));
        assert!(session.is_released());
        assert_eq!(session.state(), CameraState::Idle);
        drop(session);

        assert_eq!(backend.stop_count(), 1);
    }

    #[test]
    fn dropping_previewing_session_stops_camera() {
        let backend = FakeBackend::default();
        {
            let mut session = CameraSession::open(&backend).expect("camera should open");
            session.start_preview().expect("preview should start");
        }
        assert_eq!(backend.calls(), vec!["acquire", "start_preview", "stop"]);
    }

    #[test]
    fn release_without_preview_stops_device_once() {
        let backend = FakeBackend::default();
        let mut session = CameraSession::open(&backend).expect("camera should open");
        assert_eq!(session.preview_frame_path(), None);

        session.release();
        session.release();
        assert!(session.is_released());
        assert_eq!(session.state(), CameraState::Idle);
        drop(session);

        assert_eq!(backend.calls(), vec!["acquire", "stop"]);
    }

    #[test]
    fn capture_after_cancel_is_rejected() {
        let backend = FakeBackend::default();
        let library = temp_library("after-cancel");
        let mut session = CameraSession::open(&backend).expect("camera should open");
        session.start_preview().expect("preview should start");
        session.cancel();

        let err = session
            .capture(&library)
            .expect_err("released camera cannot capture");
        assert!(matches!(
            err,
            CameraError::InvalidTransition {
                from: CameraState::Idle,
                event: CameraEvent::Capture
            }
        ));
        drop(session);
        assert_eq!(backend.stop_count(), 1);
    }
}
