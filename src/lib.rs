pub mod app;
pub mod camera;
pub mod catalog;
mod config;
pub mod error;
pub mod logging;
pub mod notification;
pub mod photo;
pub mod shell;
pub mod state;
pub mod ui;
pub use config::{load_app_config, AppConfig};
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting catalogue");

    let config = load_app_config();
    tracing::info!(
        data_file = %config.data_file.display(),
        photo_dir = %config.photo_dir.display(),
        currency = %config.currency,
        "loaded app config"
    );

    let mut app = app::App::new(config);
    app.start()?;

    tracing::info!("shutdown complete with state={:?}", app.state());
    Ok(())
}
