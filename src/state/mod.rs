pub mod event;
pub mod machine;
pub mod model;

use thiserror::Error;

pub use event::AppEvent;
pub use machine::StateMachine;
pub use model::AppState;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("screen change {event:?} is not allowed from {from:?}")]
    InvalidStateTransition { from: AppState, event: AppEvent },
}
