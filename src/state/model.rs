/// Screen the catalogue window is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Splash,
    Browsing,
    Form,
    Camera,
}
