use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Label, Orientation, Picture, Window};

use super::worker::spawn_blocking_io;
use super::CatalogueRuntime;
use crate::camera::{CameraSession, FfmpegCamera};
use crate::error::AppError;
use crate::state::AppEvent;
use crate::ui::text_button;

type SharedCameraSession = Rc<RefCell<Option<CameraSession<FfmpegCamera>>>>;

/// Live camera preview; the camera is released however the window goes away.
pub(super) fn open_camera_dialog<F>(
    runtime: &CatalogueRuntime,
    parent: &Window,
    error_label: &Label,
    on_captured: F,
) where
    F: Fn(PathBuf) + 'static,
{
    if !runtime.machine.borrow().can_transition(AppEvent::OpenCamera) {
        return;
    }

    let mut session = match CameraSession::open(runtime.camera_backend.as_ref()) {
        Ok(session) => session,
        Err(err) => {
            runtime.report_in(error_label, AppError::from(err));
            return;
        }
    };
    if let Err(err) = session.start_preview() {
        runtime.report_in(error_label, AppError::from(err));
        return;
    }
    runtime.transition(AppEvent::OpenCamera);

    let style_tokens = runtime.style_tokens;
    let window = Window::new();
    window.add_css_class("catalogue-root");
    window.set_title(Some("Caméra"));
    window.set_transient_for(Some(parent));
    window.set_modal(true);
    window.set_destroy_with_parent(true);

    let picture = Picture::new();
    picture.set_can_shrink(true);
    picture.set_size_request(
        style_tokens.camera_preview_width,
        style_tokens.camera_preview_height,
    );

    let status_label = Label::new(Some("Démarrage de la caméra…"));
    status_label.add_css_class("empty-state");

    let cancel_button = text_button("Annuler", &[]);
    let capture_button = text_button("Capturer", &["primary-button"]);
    let action_row = GtkBox::new(Orientation::Horizontal, style_tokens.spacing_8);
    action_row.set_halign(Align::End);
    action_row.append(&cancel_button);
    action_row.append(&capture_button);

    let content = GtkBox::new(Orientation::Vertical, style_tokens.spacing_12);
    content.set_margin_top(style_tokens.spacing_12);
    content.set_margin_bottom(style_tokens.spacing_12);
    content.set_margin_start(style_tokens.spacing_12);
    content.set_margin_end(style_tokens.spacing_12);
    content.append(&picture);
    content.append(&status_label);
    content.append(&action_row);
    window.set_child(Some(&content));

    let shared: SharedCameraSession = Rc::new(RefCell::new(Some(session)));
    let finished = Rc::new(Cell::new(false));

    {
        let shared = shared.clone();
        gtk4::glib::timeout_add_local(
            Duration::from_millis(u64::from(style_tokens.camera_poll_ms)),
            move || refresh_preview(&shared, &picture, &status_label),
        );
    }
    {
        let shared = shared.clone();
        let window = window.clone();
        let runtime = runtime.clone();
        let error_label = error_label.clone();
        let library = runtime.session.borrow().library().clone();
        let on_captured = Rc::new(on_captured);
        capture_button.connect_clicked(move |button| {
            let taken = shared.borrow_mut().take();
            let Some(mut session) = taken else {
                return;
            };
            button.set_sensitive(false);

            let library = library.clone();
            let window = window.clone();
            let runtime = runtime.clone();
            let error_label = error_label.clone();
            let on_captured = on_captured.clone();
            spawn_blocking_io(
                "camera capture",
                move || session.capture(&library),
                move |result| {
                    match result {
                        Ok(path) => {
                            tracing::info!(path = %path.display(), "camera photo captured");
                            on_captured(path);
                        }
                        Err(err) => runtime.report_in(&error_label, AppError::from(err)),
                    }
                    window.close();
                },
            );
        });
    }
    {
        let window = window.clone();
        cancel_button.connect_clicked(move |_| window.close());
    }
    {
        let shared = shared.clone();
        let finished = finished.clone();
        let runtime = runtime.clone();
        window.connect_close_request(move |_| {
            release_camera(&shared, &finished, &runtime);
            gtk4::glib::Propagation::Proceed
        });
    }
    {
        let runtime = runtime.clone();
        window.connect_destroy(move |_| release_camera(&shared, &finished, &runtime));
    }

    window.present();
}

fn refresh_preview(
    shared: &SharedCameraSession,
    picture: &Picture,
    status_label: &Label,
) -> gtk4::glib::ControlFlow {
    let guard = shared.borrow();
    let Some(session) = guard.as_ref() else {
        return gtk4::glib::ControlFlow::Break;
    };
    let Some(frame_path) = session.preview_frame_path() else {
        return gtk4::glib::ControlFlow::Continue;
    };
    if !frame_path.exists() {
        return gtk4::glib::ControlFlow::Continue;
    }

    let file = gtk4::gio::File::for_path(frame_path);
    match gtk4::gdk::Texture::from_file(&file) {
        Ok(texture) => {
            picture.set_paintable(Some(&texture));
            status_label.set_visible(false);
        }
        // Frame still being written.
        Err(err) => tracing::trace!(?err, "camera preview frame not ready"),
    }
    gtk4::glib::ControlFlow::Continue
}

fn release_camera(shared: &SharedCameraSession, finished: &Cell<bool>, runtime: &CatalogueRuntime) {
    let taken = shared.borrow_mut().take();
    if let Some(mut session) = taken {
        session.cancel();
    }
    if !finished.replace(true) {
        runtime.transition(AppEvent::CloseCamera);
    }
}
