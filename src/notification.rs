use notify_rust::{Notification, Timeout};

use crate::error::AppError;

const APP_NAME: &str = "Catalogue";
const SUMMARY: &str = "Mon Catalogue";
const ICON_NAME: &str = "dialog-warning-symbolic";
const TIMEOUT_MS: u32 = 6_000;

/// Forwards an error to the desktop when it means data was not saved.
///
/// Returns whether a notification was attempted.
pub fn notify_failure(err: &AppError) -> bool {
    if !err.is_persistence_failure() {
        return false;
    }
    send(err.user_message());
    true
}

/// Startup failures have no window to report into.
pub fn notify_startup_failure(err: &AppError) {
    send(startup_message(err));
}

fn startup_message(err: &AppError) -> String {
    format!("Démarrage impossible. {}", err.user_message())
}

pub fn send(body: impl Into<String>) {
    let body = body.into();
    if let Err(err) = Notification::new()
        .appname(APP_NAME)
        .summary(SUMMARY)
        .icon(ICON_NAME)
        .timeout(Timeout::Milliseconds(TIMEOUT_MS))
        .body(&body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ArticleError, StoreError};
    use crate::shell::IntentError;
    use std::path::PathBuf;

    #[test]
    fn form_errors_stay_in_the_window() {
        let err = AppError::from(IntentError::InvalidForm(ArticleError::EmptyPrice));
        assert!(!notify_failure(&err));
    }

    #[test]
    fn startup_message_names_the_unreadable_file() {
        let source = serde_json::from_str::<Vec<serde_json::Value>>("[{")
            .expect_err("truncated json should not parse");
        let err = AppError::from(StoreError::Parse {
            path: PathBuf::from("articles.json"),
            source,
        });
        assert_eq!(
            startup_message(&err),
            "Démarrage impossible. Fichier du catalogue illisible : articles.json"
        );
    }
}
