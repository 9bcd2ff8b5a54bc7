use crate::camera::CameraError;
use crate::catalog::{ArticleError, StoreError};
use crate::photo::PhotoError;
use crate::shell::IntentError;
use crate::state::StateError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Photo(#[from] PhotoError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Intent(#[from] IntentError),
    #[error("gtk application exited with status {status}")]
    Gtk { status: String },
}

impl AppError {
    /// Short French message for the in-window toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Camera(CameraError::DeviceUnavailable { .. }) => {
                "Aucune caméra disponible".to_string()
            }
            Self::Camera(err) => format!("Erreur caméra : {err}"),
            Self::Photo(PhotoError::SourceNotFound { .. }) => "Photo introuvable".to_string(),
            Self::Photo(err) => format!("Erreur photo : {err}"),
            Self::Intent(IntentError::InvalidForm(err)) => form_message(err).to_string(),
            Self::Store(StoreError::Parse { path, .. }) => {
                format!("Fichier du catalogue illisible : {}", path.display())
            }
            Self::Store(StoreError::Read { path, .. }) => {
                format!("Lecture du catalogue impossible : {}", path.display())
            }
            Self::Intent(IntentError::Store(err)) | Self::Store(err) => {
                format!("Échec de l'enregistrement : {err}")
            }
            Self::State(err) => err.to_string(),
            Self::Gtk { status } => format!("GTK a quitté : {status}"),
        }
    }

    /// Persistence failures also go to the desktop notification area.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Intent(IntentError::Store(_)) | Self::Photo(PhotoError::Io(_))
        )
    }
}

fn form_message(err: &ArticleError) -> &'static str {
    match err {
        ArticleError::EmptyName => "Le nom est obligatoire",
        ArticleError::EmptyPrice => "Le prix est obligatoire",
        ArticleError::InvalidPrice { .. } => "Prix invalide",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn device_unavailable_maps_to_friendly_message() {
        let err = AppError::from(CameraError::DeviceUnavailable {
            message: "no /dev/video*".to_string(),
        });
        assert_eq!(err.user_message(), "Aucune caméra disponible");
        assert!(!err.is_persistence_failure());
    }

    #[test]
    fn store_write_failure_is_a_persistence_failure() {
        let err = AppError::from(IntentError::Store(StoreError::Write {
            path: PathBuf::from("articles.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }));
        assert!(err.is_persistence_failure());
        assert!(err.user_message().starts_with("Échec de l'enregistrement"));
    }

    #[test]
    fn invalid_form_is_reported_but_not_notified() {
        let err = AppError::from(IntentError::InvalidForm(ArticleError::EmptyName));
        assert!(!err.is_persistence_failure());
        assert_eq!(err.user_message(), "Le nom est obligatoire");
    }

    #[test]
    fn invalid_price_message_hides_raw_input() {
        let err = AppError::from(IntentError::InvalidForm(ArticleError::InvalidPrice {
            input: "douze".to_string(),
        }));
        assert_eq!(err.user_message(), "Prix invalide");
    }
}
