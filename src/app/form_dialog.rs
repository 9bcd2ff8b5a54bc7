use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Dialog, Entry, FileChooserAction, FileChooserNative, FileFilter,
    InputPurpose, Label, Orientation, ResponseType, Window,
};

use super::camera_dialog::open_camera_dialog;
use super::worker::spawn_blocking_io;
use super::CatalogueRuntime;
use crate::error::AppError;
use crate::photo::resolve_display;
use crate::shell::{ArticleForm, CardImage, Intent};
use crate::state::AppEvent;
use crate::ui::{photo_widget, text_button, StyleTokens};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum FormMode {
    Create,
    Edit { id: String },
}

impl FormMode {
    fn title(&self) -> &'static str {
        match self {
            Self::Create => "Nouvel article",
            Self::Edit { .. } => "Modifier l'article",
        }
    }

    fn into_intent(self, form: ArticleForm) -> Intent {
        match self {
            Self::Create => Intent::Create(form),
            Self::Edit { id } => Intent::Edit { id, form },
        }
    }
}

/// Photo picked in the open form; already copied into the photo library.
#[derive(Clone)]
struct PendingPhoto {
    path: Rc<RefCell<Option<PathBuf>>>,
    slot: GtkBox,
    size: i32,
}

impl PendingPhoto {
    fn new(initial: &CardImage, size: i32) -> Self {
        let slot = GtkBox::new(Orientation::Vertical, 0);
        slot.set_halign(Align::Center);
        slot.append(&photo_widget(initial, size));
        Self {
            path: Rc::new(RefCell::new(None)),
            slot,
            size,
        }
    }

    fn set(&self, path: PathBuf) {
        while let Some(child) = self.slot.first_child() {
            self.slot.remove(&child);
        }
        self.slot
            .append(&photo_widget(&CardImage::Photo(path.clone()), self.size));
        self.path.replace(Some(path));
    }

    fn get(&self) -> Option<PathBuf> {
        self.path.borrow().clone()
    }
}

pub(super) fn open_form_dialog(runtime: &CatalogueRuntime, mode: FormMode) {
    let (form, current_image) = match &mode {
        FormMode::Create => (ArticleForm::default(), CardImage::Placeholder),
        FormMode::Edit { id } => {
            let session = runtime.session.borrow();
            let Some(article) = session.article(id) else {
                tracing::warn!(id = %id, "edit requested for unknown article");
                return;
            };
            let image = resolve_display(article.photo_path.as_deref())
                .map(CardImage::Photo)
                .unwrap_or(CardImage::Placeholder);
            (ArticleForm::for_article(article), image)
        }
    };

    if !runtime.transition(AppEvent::OpenForm) {
        return;
    }

    let style_tokens = runtime.style_tokens;
    let window = Window::new();
    window.add_css_class("catalogue-root");
    window.set_title(Some(mode.title()));
    window.set_transient_for(Some(&runtime.window));
    window.set_modal(true);
    window.set_destroy_with_parent(true);
    window.set_default_size(style_tokens.form_width, -1);

    let pending_photo = PendingPhoto::new(&current_image, style_tokens.form_photo_size);

    let name_entry = Entry::new();
    name_entry.set_placeholder_text(Some("Nom du produit"));
    name_entry.set_text(&form.name_text);

    let price_entry = Entry::new();
    price_entry.set_placeholder_text(Some("Prix"));
    price_entry.set_input_purpose(InputPurpose::Number);
    price_entry.set_text(&form.price_text);

    let gallery_button = text_button("Galerie", &[]);
    gallery_button.set_hexpand(true);
    let camera_button = text_button("Caméra", &[]);
    camera_button.set_hexpand(true);
    let photo_row = GtkBox::new(Orientation::Horizontal, style_tokens.spacing_8);
    photo_row.append(&gallery_button);
    photo_row.append(&camera_button);

    let error_label = Label::new(None);
    error_label.add_css_class("form-error");
    error_label.set_wrap(true);
    error_label.set_visible(false);

    let cancel_button = text_button("Annuler", &[]);
    let save_button = text_button("Enregistrer", &["primary-button"]);
    let action_row = GtkBox::new(Orientation::Horizontal, style_tokens.spacing_8);
    action_row.set_halign(Align::End);
    if let FormMode::Edit { id } = &mode {
        let delete_button = text_button("Supprimer", &["danger-button"]);
        let runtime = runtime.clone();
        let window = window.clone();
        let error_label = error_label.clone();
        let id = id.clone();
        delete_button.connect_clicked(move |_| {
            confirm_delete(&runtime, &window, &id, &error_label);
        });
        action_row.append(&delete_button);
    }
    action_row.append(&cancel_button);
    action_row.append(&save_button);

    let content = GtkBox::new(Orientation::Vertical, style_tokens.spacing_12);
    content.set_margin_top(style_tokens.spacing_16);
    content.set_margin_bottom(style_tokens.spacing_16);
    content.set_margin_start(style_tokens.spacing_16);
    content.set_margin_end(style_tokens.spacing_16);
    content.append(&pending_photo.slot);
    content.append(&name_entry);
    content.append(&price_entry);
    content.append(&photo_row);
    content.append(&error_label);
    content.append(&action_row);
    window.set_child(Some(&content));

    let chooser_slot = Rc::new(RefCell::new(None::<FileChooserNative>));
    {
        let runtime = runtime.clone();
        let window = window.clone();
        let pending_photo = pending_photo.clone();
        let error_label = error_label.clone();
        let chooser_slot = chooser_slot.clone();
        gallery_button.connect_clicked(move |_| {
            open_gallery_chooser(
                &runtime,
                &window,
                &chooser_slot,
                &pending_photo,
                &error_label,
            );
        });
    }
    {
        let runtime = runtime.clone();
        let window = window.clone();
        let pending_photo = pending_photo.clone();
        let error_label = error_label.clone();
        camera_button.connect_clicked(move |_| {
            let pending_photo = pending_photo.clone();
            open_camera_dialog(&runtime, &window, &error_label, move |path| {
                pending_photo.set(path)
            });
        });
    }
    {
        let window = window.clone();
        cancel_button.connect_clicked(move |_| window.close());
    }
    for entry in [&name_entry, &price_entry] {
        let save_button = save_button.clone();
        entry.connect_activate(move |_| save_button.emit_clicked());
    }
    {
        let runtime = runtime.clone();
        let window = window.clone();
        let error_label = error_label.clone();
        save_button.connect_clicked(move |_| {
            let form = ArticleForm {
                name_text: name_entry.text().to_string(),
                price_text: price_entry.text().to_string(),
                photo: pending_photo.get(),
            };
            match runtime.apply(mode.clone().into_intent(form)) {
                Ok(()) => {
                    runtime
                        .page
                        .toast
                        .show("Article enregistré", style_tokens.toast_duration_ms);
                    window.close();
                }
                Err(err) => runtime.report_in(&error_label, err),
            }
        });
    }
    {
        let runtime = runtime.clone();
        window.connect_close_request(move |_| {
            if let Some(chooser) = chooser_slot.borrow_mut().take() {
                chooser.destroy();
            }
            runtime.transition(AppEvent::CloseForm);
            gtk4::glib::Propagation::Proceed
        });
    }

    window.present();
}

#[allow(deprecated)]
fn open_gallery_chooser(
    runtime: &CatalogueRuntime,
    window: &Window,
    chooser_slot: &Rc<RefCell<Option<FileChooserNative>>>,
    pending_photo: &PendingPhoto,
    error_label: &Label,
) {
    if chooser_slot.borrow().is_some() {
        return;
    }

    let chooser = FileChooserNative::new(
        Some("Choisir une photo"),
        Some(window),
        FileChooserAction::Open,
        Some("Ouvrir"),
        Some("Annuler"),
    );
    chooser.set_modal(true);
    let filter = FileFilter::new();
    filter.set_name(Some("Images"));
    filter.add_mime_type("image/*");
    chooser.add_filter(&filter);

    let runtime = runtime.clone();
    let pending_photo = pending_photo.clone();
    let error_label = error_label.clone();
    let slot = chooser_slot.clone();
    chooser.connect_response(move |chooser, response| {
        if response == ResponseType::Accept {
            match chooser.file().and_then(|file| file.path()) {
                Some(source) => {
                    import_gallery_photo(&runtime, source, &pending_photo, &error_label)
                }
                None => tracing::warn!("gallery chooser returned no local path"),
            }
        }
        let taken = slot.borrow_mut().take();
        if let Some(chooser) = taken {
            chooser.destroy();
        }
    });

    chooser.show();
    chooser_slot.replace(Some(chooser));
}

fn import_gallery_photo(
    runtime: &CatalogueRuntime,
    source: PathBuf,
    pending_photo: &PendingPhoto,
    error_label: &Label,
) {
    let library = runtime.session.borrow().library().clone();
    let runtime = runtime.clone();
    let pending_photo = pending_photo.clone();
    let error_label = error_label.clone();
    spawn_blocking_io(
        "gallery import",
        move || library.import_from_gallery(&source),
        move |result| match result {
            Ok(path) => pending_photo.set(path),
            Err(err) => runtime.report_in(&error_label, AppError::from(err)),
        },
    );
}

fn confirm_delete(runtime: &CatalogueRuntime, form_window: &Window, id: &str, error_label: &Label) {
    let name = runtime
        .session
        .borrow()
        .article(id)
        .map(|article| article.name.clone())
        .unwrap_or_default();
    let style_tokens: StyleTokens = runtime.style_tokens;

    let dialog = Dialog::new();
    dialog.add_css_class("catalogue-root");
    dialog.set_title(Some("Supprimer l'article"));
    dialog.set_transient_for(Some(form_window));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.add_button("Annuler", ResponseType::Cancel);
    dialog.add_button("Supprimer", ResponseType::Accept);
    dialog.set_default_response(ResponseType::Cancel);

    let body_text = format!("Supprimer « {name} » ?");
    let body = Label::new(Some(body_text.as_str()));
    body.set_xalign(0.5);
    body.set_wrap(true);

    let dialog_content = GtkBox::new(Orientation::Vertical, 0);
    dialog_content.set_margin_top(style_tokens.spacing_12);
    dialog_content.set_margin_bottom(style_tokens.spacing_12);
    dialog_content.set_margin_start(style_tokens.spacing_12);
    dialog_content.set_margin_end(style_tokens.spacing_12);
    dialog_content.append(&body);
    dialog.content_area().append(&dialog_content);

    let runtime = runtime.clone();
    let form_window = form_window.clone();
    let error_label = error_label.clone();
    let id = id.to_string();
    dialog.connect_response(move |dialog, response| {
        if response != ResponseType::Accept {
            dialog.close();
            return;
        }
        match runtime.apply(Intent::Delete { id: id.clone() }) {
            Ok(()) => {
                runtime
                    .page
                    .toast
                    .show("Article supprimé", style_tokens.toast_duration_ms);
                dialog.close();
                form_window.close();
            }
            Err(err) => {
                dialog.close();
                runtime.report_in(&error_label, err);
            }
        }
    });

    dialog.present();
}
