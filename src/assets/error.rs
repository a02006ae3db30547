//! Asset loading errors

/// Errors that can occur while loading assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No asset exists under the requested name
    NotFound(String),
    /// A shader program failed to compile or link
    Compile {
        /// Stage sources the program was built from
        program: String,
        /// Compiler output
        message: String,
    },
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "asset not found: {name}"),
            Self::Compile { program, message } => {
                write!(f, "failed to compile shader {program}: {message}")
            }
        }
    }
}

impl std::error::Error for AssetError {}
