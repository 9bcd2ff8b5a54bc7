#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    OpenCatalogue,
    OpenForm,
    OpenCamera,
    CloseCamera,
    CloseForm,
}
