use super::dom::NodeId;

// Represents errors that can occur within the platform abstraction layer.
//
// This enum centralizes failures of element-tree operations and of the map
// engine's control registration protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// An operation named a node that does not exist (or was released).
    InvalidNode(NodeId),
    /// The control is already registered with this map.
    ControlAlreadyRegistered,
    /// The control is not registered with this map.
    ControlNotRegistered,
    /// A requested operation could not be completed.
    OperationFailed(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::InvalidNode(id) => write!(f, "Invalid Node: {id:?}"),
            PlatformError::ControlAlreadyRegistered => {
                write!(f, "Control Already Registered")
            }
            PlatformError::ControlNotRegistered => write!(f, "Control Not Registered"),
            PlatformError::OperationFailed(s) => write!(f, "Operation Failed: {s}"),
        }
    }
}

impl std::error::Error for PlatformError {}

/// A specialized `Result` type for platform layer operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
