use super::{StateError, StateResult};
use super::{AppEvent, AppState};

#[derive(Debug)]
pub struct StateMachine {
    state: AppState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn can_transition(&self, event: AppEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: AppEvent) -> Option<AppState> {
        use AppEvent::*;
        match (self.state, event) {
            (AppState::Splash, OpenCatalogue) => Some(AppState::Browsing),
            (AppState::Browsing, OpenForm) => Some(AppState::Form),
            (AppState::Form, OpenCamera) => Some(AppState::Camera),
            (AppState::Camera, CloseCamera) => Some(AppState::Form),
            (AppState::Form, CloseForm) => Some(AppState::Browsing),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: AppEvent) -> StateResult<AppState> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        self.state = next;
        Ok(next)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(AppEvent::OpenCatalogue));
        assert!(!machine.can_transition(AppEvent::OpenForm));

        let _ = machine
            .transition(AppEvent::OpenCatalogue)
            .expect("splash -> browsing should transition");

        assert!(machine.can_transition(AppEvent::OpenForm));
        assert!(!machine.can_transition(AppEvent::OpenCamera));
        assert!(!machine.can_transition(AppEvent::OpenCatalogue));
    }

    #[test]
    fn camera_round_trip_returns_to_browsing() {
        let mut machine = StateMachine::new();
        let visited = [
            AppEvent::OpenCatalogue,
            AppEvent::OpenForm,
            AppEvent::OpenCamera,
            AppEvent::CloseCamera,
            AppEvent::CloseForm,
        ]
        .map(|event| {
            machine
                .transition(event)
                .expect("scripted flow should be valid")
        });

        assert_eq!(
            visited,
            [
                AppState::Browsing,
                AppState::Form,
                AppState::Camera,
                AppState::Form,
                AppState::Browsing,
            ]
        );
        assert_eq!(machine.state(), AppState::Browsing);
    }

    #[test]
    fn invalid_transition_returns_error_and_keeps_state() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(AppEvent::CloseForm)
            .expect_err("splash -> close form should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: AppState::Splash,
                event: AppEvent::CloseForm
            }
        ));
        assert_eq!(machine.state(), AppState::Splash);
    }
}
