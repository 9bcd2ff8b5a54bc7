use std::cell::RefCell;
use std::rc::Rc;

use crate::camera::SystemCameraBackend;
use crate::catalog::ArticleStore;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::notification;
use crate::photo::PhotoLibrary;
use crate::shell::{CatalogueSession, CatalogueView, Intent};
use crate::state::{AppEvent, AppState, StateMachine};
use crate::ui::{StyleTokens, LAYOUT_TOKENS};
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, Label, Stack, StackTransitionType};

mod camera_dialog;
mod catalogue_page;
mod form_dialog;
mod runtime_css;
mod splash;
mod toast;
mod worker;

use self::catalogue_page::{build_catalogue_page, CataloguePage};
use self::form_dialog::{open_form_dialog, FormMode};
use self::runtime_css::install_runtime_css;
use self::splash::build_splash_page;

const APP_ID: &str = "tn.catalogue.Catalogue";
const WINDOW_TITLE: &str = "Mon Catalogue";
const SPLASH_PAGE: &str = "splash";
const CATALOGUE_PAGE: &str = "catalogue";

/// Shared handles for every GTK callback of the catalogue window.
#[derive(Clone)]
pub(super) struct CatalogueRuntime {
    pub(super) window: ApplicationWindow,
    pub(super) session: Rc<RefCell<CatalogueSession>>,
    pub(super) machine: Rc<RefCell<StateMachine>>,
    pub(super) page: CataloguePage,
    pub(super) camera_backend: Rc<SystemCameraBackend>,
    pub(super) style_tokens: StyleTokens,
}

impl CatalogueRuntime {
    pub(super) fn render(&self) {
        let view = self.session.borrow().view();
        self.render_view(&view);
    }

    fn render_view(&self, view: &CatalogueView) {
        let runtime = self.clone();
        self.page.render(view, move |id: &str| {
            open_form_dialog(
                &runtime,
                FormMode::Edit {
                    id: id.to_string(),
                },
            );
        });
    }

    /// Applies an intent and re-renders; the error is returned for the caller to show.
    pub(super) fn apply(&self, intent: Intent) -> AppResult<()> {
        let result = self.session.borrow_mut().handle(intent);
        match result {
            Ok(view) => {
                self.render_view(&view);
                Ok(())
            }
            Err(err) => Err(AppError::from(err)),
        }
    }

    pub(super) fn report(&self, err: AppError) {
        tracing::warn!(?err, "reporting error to user");
        notification::notify_failure(&err);
        self.page
            .toast
            .show(err.user_message(), self.style_tokens.toast_duration_ms);
    }

    /// Same as [`Self::report`] but shown inside a modal instead of the toast.
    pub(super) fn report_in(&self, label: &Label, err: AppError) {
        tracing::warn!(?err, "reporting error in dialog");
        notification::notify_failure(&err);
        label.set_text(&err.user_message());
        label.set_visible(true);
    }

    pub(super) fn transition(&self, event: AppEvent) -> bool {
        let result = self.machine.borrow_mut().transition(event);
        match result {
            Ok(state) => {
                tracing::debug!(?event, ?state, "screen transition");
                true
            }
            Err(err) => {
                tracing::warn!(?err, "screen transition rejected");
                false
            }
        }
    }
}

pub struct App {
    config: AppConfig,
    machine: StateMachine,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            machine: StateMachine::new(),
        }
    }

    pub fn state(&self) -> AppState {
        self.machine.state()
    }

    pub fn start(&mut self) -> AppResult<()> {
        let session = match open_session(&self.config) {
            Ok(session) => Rc::new(RefCell::new(session)),
            Err(err) => {
                tracing::error!(?err, "catalogue could not start");
                notification::notify_startup_failure(&err);
                return Err(err);
            }
        };
        let shared_machine = Rc::new(RefCell::new(std::mem::take(&mut self.machine)));
        let camera_backend = Rc::new(SystemCameraBackend::new(self.config.camera_device.clone()));

        tracing::info!("starting gtk runtime");
        let application = Application::new(
            Some(APP_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );

        let session_for_activate = session.clone();
        let machine_for_activate = shared_machine.clone();
        application.connect_activate(move |app| {
            if let Some(window) = app.active_window() {
                window.present();
                return;
            }

            let style_tokens = LAYOUT_TOKENS;
            install_runtime_css(style_tokens);

            let window = ApplicationWindow::new(app);
            window.add_css_class("catalogue-root");
            window.set_title(Some(WINDOW_TITLE));
            window.set_default_size(
                style_tokens.window_default_width,
                style_tokens.window_default_height,
            );

            let page = build_catalogue_page(style_tokens);
            let runtime = CatalogueRuntime {
                window: window.clone(),
                session: session_for_activate.clone(),
                machine: machine_for_activate.clone(),
                page: page.clone(),
                camera_backend: camera_backend.clone(),
                style_tokens,
            };

            let stack = Stack::new();
            stack.set_transition_type(StackTransitionType::Crossfade);

            let runtime_for_splash = runtime.clone();
            let stack_for_splash = stack.clone();
            let splash_page = build_splash_page(style_tokens, move || {
                if runtime_for_splash.transition(AppEvent::OpenCatalogue) {
                    runtime_for_splash.render();
                    stack_for_splash.set_visible_child_name(CATALOGUE_PAGE);
                    runtime_for_splash.page.search_entry.grab_focus();
                }
            });
            stack.add_named(&splash_page, Some(SPLASH_PAGE));
            stack.add_named(&page.root, Some(CATALOGUE_PAGE));
            stack.set_visible_child_name(SPLASH_PAGE);

            {
                let runtime = runtime.clone();
                page.search_entry.connect_search_changed(move |entry| {
                    let query = entry.text().to_string();
                    if let Err(err) = runtime.apply(Intent::SearchChanged(query)) {
                        runtime.report(err);
                    }
                });
            }
            {
                let runtime = runtime.clone();
                page.add_button.connect_clicked(move |_| {
                    open_form_dialog(&runtime, FormMode::Create);
                });
            }

            window.set_child(Some(&stack));
            tracing::info!(
                articles = session_for_activate.borrow().store().len(),
                "presenting catalogue window"
            );
            window.present();
        });

        // Only argv[0] reaches GTK; the app takes no flags.
        let gtk_args = [env!("CARGO_PKG_NAME")];
        let exit_code = application.run_with_args(&gtk_args);

        self.machine = std::mem::take(&mut *shared_machine.borrow_mut());
        if exit_code != gtk4::glib::ExitCode::SUCCESS {
            return Err(AppError::Gtk {
                status: format!("{exit_code:?}"),
            });
        }
        Ok(())
    }
}

/// Loads the article file and photo directory named by `config`.
fn open_session(config: &AppConfig) -> AppResult<CatalogueSession> {
    let store = ArticleStore::load(&config.data_file)?;
    let library = PhotoLibrary::open(&config.photo_dir)?;
    Ok(CatalogueSession::new(
        store,
        library,
        config.currency.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StoreError;
    use std::path::PathBuf;

    fn temp_root(label: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "catalogue-app-{label}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).expect("temp root should be creatable");
        root
    }

    fn config_in(root: &std::path::Path) -> AppConfig {
        AppConfig {
            data_file: root.join("articles.json"),
            photo_dir: root.join("photos"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn open_session_loads_existing_articles() {
        let root = temp_root("ok");
        std::fs::write(
            root.join("articles.json"),
            r#"[{"id":"1","nom":"Dattes","prix":9.0,"photo_path":null,"description":""}]"#,
        )
        .expect("seed file");

        let session = open_session(&config_in(&root)).expect("session should open");
        assert_eq!(session.store().len(), 1);
        assert!(root.join("photos").is_dir());
    }

    #[test]
    fn truncated_article_file_fails_startup_with_readable_message() {
        let root = temp_root("truncated");
        std::fs::write(root.join("articles.json"), r#"[{"id":"1","nom":"Dat"#)
            .expect("seed truncated file");

        let err = match open_session(&config_in(&root)) {
            Ok(_) => panic!("truncated file should not load"),
            Err(err) => err,
        };
        assert!(matches!(err, AppError::Store(StoreError::Parse { .. })));
        assert!(err.user_message().starts_with("Fichier du catalogue illisible"));
        assert!(err.user_message().contains("articles.json"));
    }

    #[test]
    fn uncreatable_photo_dir_fails_startup() {
        let root = temp_root("photo-dir");
        // A regular file where the photo directory should be.
        std::fs::write(root.join("photos"), b"").expect("seed blocking file");

        let err = match open_session(&config_in(&root)) {
            Ok(_) => panic!("photo dir under a file should not open"),
            Err(err) => err,
        };
        assert!(matches!(err, AppError::Photo(_)));
        assert!(err.is_persistence_failure());
    }
}
