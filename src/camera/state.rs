use super::CameraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraState {
    #[default]
    Idle,
    Previewing,
    Captured,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEvent {
    StartPreview,
    Capture,
    Cancel,
    Release,
}

#[derive(Debug, Default)]
pub struct CameraStateMachine {
    state: CameraState,
}

impl CameraStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn can_transition(&self, event: CameraEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: CameraEvent) -> Option<CameraState> {
        use CameraEvent::*;
        match (self.state, event) {
            (CameraState::Idle, StartPreview) => Some(CameraState::Previewing),
            (CameraState::Previewing, Capture) => Some(CameraState::Captured),
            (CameraState::Previewing, Cancel) => Some(CameraState::Cancelled),
            (CameraState::Captured | CameraState::Cancelled, Release) => Some(CameraState::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: CameraEvent) -> Result<CameraState, CameraError> {
        tracing::debug!(from = ?self.state, event = ?event, "request camera transition");
        let next = self.next_state(event).ok_or_else(|| {
            tracing::warn!(from = ?self.state, event = ?event, "invalid camera transition requested");
            CameraError::InvalidTransition {
                from: self.state,
                event,
            }
        })?;
        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_path_returns_to_idle() {
        let mut machine = CameraStateMachine::new();
        assert_eq!(
            machine.transition(CameraEvent::StartPreview).expect("start"),
            CameraState::Previewing
        );
        assert_eq!(
            machine.transition(CameraEvent::Capture).expect("capture"),
            CameraState::Captured
        );
        assert_eq!(
            machine.transition(CameraEvent::Release).expect("release"),
            CameraState::Idle
        );
    }

    #[test]
    fn cancel_path_returns_to_idle() {
        let mut machine = CameraStateMachine::new();
        let _ = machine.transition(CameraEvent::StartPreview).expect("start");
        assert_eq!(
            machine.transition(CameraEvent::Cancel).expect("cancel"),
            CameraState::Cancelled
        );
        assert!(!machine.can_transition(CameraEvent::Capture));
        assert_eq!(
            machine.transition(CameraEvent::Release).expect("release"),
            CameraState::Idle
        );
    }

    #[test]
    fn capture_without_preview_is_rejected() {
        let mut machine = CameraStateMachine::new();
        let err = machine
            .transition(CameraEvent::Capture)
            .expect_err("idle camera cannot capture");
        assert!(matches!(
            err,
            CameraError::InvalidTransition {
                from: CameraState::Idle,
                event: CameraEvent::Capture
            }
        ));
        assert_eq!(machine.state(), CameraState::Idle);
    }
}
