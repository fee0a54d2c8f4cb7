use crate::model::OptionsError;
use crate::platform_layer::PlatformError;

// Errors surfaced by the control and its bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitcherError {
    /// The supplied options are unusable.
    Options(OptionsError),
    /// The element tree or the map engine refused an operation.
    Platform(PlatformError),
}

impl From<OptionsError> for SwitcherError {
    fn from(err: OptionsError) -> Self {
        SwitcherError::Options(err)
    }
}

impl From<PlatformError> for SwitcherError {
    fn from(err: PlatformError) -> Self {
        SwitcherError::Platform(err)
    }
}

impl std::fmt::Display for SwitcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitcherError::Options(e) => write!(f, "Invalid options: {e}"),
            SwitcherError::Platform(e) => write!(f, "Platform error: {e}"),
        }
    }
}

impl std::error::Error for SwitcherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwitcherError::Options(e) => Some(e),
            SwitcherError::Platform(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwitcherError>;
