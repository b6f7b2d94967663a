//! Error types and context management for extraction and solving

use std::fmt;
use std::path::PathBuf;

use crate::catalog::modules::ModuleId;
use crate::spatial::neighborhood::Offset;

/// Main error type for all pattern extraction and generation operations
#[derive(Debug)]
pub enum TilewaveError {
    /// A sampled orientation is not a multiple of 90° about the vertical axis
    InvalidRotation {
        /// Quaternion as read, in (w, x, y, z) order
        quaternion: [f64; 4],
        /// Where the orientation was found
        location: String,
    },

    /// A pattern key was never recorded in the catalog
    UnknownPattern {
        /// Module at the origin cell
        point_a: ModuleId,
        /// Module at the offset cell
        point_b: ModuleId,
        /// Relative position of `point_b`
        offset: Offset,
        /// Grid cell where the lookup happened, if any
        position: Option<[usize; 3]>,
    },

    /// A module id is not registered
    UnknownModule {
        /// The unregistered id
        id: ModuleId,
        /// Number of registered modules
        registered: usize,
    },

    /// No module of the requested type exists at rotation zero
    UnknownModuleType {
        /// Requested type name
        kind: String,
    },

    /// A cell ran out of possibilities
    ///
    /// Occurs when propagation or a forced collapse leaves a cell with no
    /// permissible module. The solve cannot continue past this point.
    Contradiction {
        /// Grid cell that became empty
        position: [usize; 3],
        /// Solver iteration when this occurred
        iteration: usize,
        /// Module being forced at the cell, if the contradiction came from seeding
        module: Option<ModuleId>,
    },

    /// A template or catalog artifact could not be parsed
    MalformedArtifact {
        /// Path to the artifact
        path: PathBuf,
        /// 1-based line number, 0 when the problem is not line-specific
        line: usize,
        /// Description of what's wrong
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Source data doesn't meet solver requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for TilewaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRotation {
                quaternion,
                location,
            } => {
                let [w, x, y, z] = quaternion;
                write!(
                    f,
                    "Invalid rotation (w={w}, x={x}, y={y}, z={z}) at {location}: \
                     orientations must be precise multiples of 90 degrees about the vertical axis"
                )
            }
            Self::UnknownPattern {
                point_a,
                point_b,
                offset,
                position,
            } => {
                write!(f, "Unknown pattern ({point_a}, {point_b}, {offset})")?;
                if let Some([x, y, z]) = position {
                    write!(f, " at cell ({x}, {y}, {z})")?;
                }
                Ok(())
            }
            Self::UnknownModule { id, registered } => {
                write!(
                    f,
                    "Module id {id} is not registered ({registered} modules known)"
                )
            }
            Self::UnknownModuleType { kind } => {
                write!(f, "No module of type '{kind}' at rotation 0")
            }
            Self::Contradiction {
                position,
                iteration,
                module,
            } => {
                let [x, y, z] = position;
                write!(
                    f,
                    "Contradiction at cell ({x}, {y}, {z}) in iteration {iteration}"
                )?;
                if let Some(id) = module {
                    write!(f, " while forcing module {id}")?;
                }
                Ok(())
            }
            Self::MalformedArtifact { path, line, reason } => {
                if *line == 0 {
                    write!(f, "Malformed artifact '{}': {reason}", path.display())
                } else {
                    write!(
                        f,
                        "Malformed artifact '{}' line {line}: {reason}",
                        path.display()
                    )
                }
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for TilewaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl TilewaveError {
    /// Whether this error is a legitimate solver outcome rather than a fault
    pub const fn is_contradiction(&self) -> bool {
        matches!(self, Self::Contradiction { .. })
    }
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, TilewaveError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Current solver iteration
    pub iteration: Option<usize>,
    /// Grid cell being processed
    pub position: Option<[usize; 3]>,
}

/// Enriches error messages with solver state information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the iteration context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the iteration applied
    fn with_iteration(self, iteration: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<TilewaveError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                TilewaveError::Contradiction { iteration, .. } => {
                    if let Some(iter) = context.iteration {
                        *iteration = iter;
                    }
                }
                TilewaveError::UnknownPattern { position, .. } => {
                    if position.is_none() {
                        *position = context.position;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_iteration(self, iteration: usize) -> Result<T> {
        self.with_context(ErrorContext {
            iteration: Some(iteration),
            ..Default::default()
        })
    }
}

impl From<std::io::Error> for TilewaveError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TilewaveError {
    TilewaveError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed artifact error for a specific line
pub fn malformed_artifact(
    path: impl Into<PathBuf>,
    line: usize,
    reason: &impl ToString,
) -> TilewaveError {
    TilewaveError::MalformedArtifact {
        path: path.into(),
        line,
        reason: reason.to_string(),
    }
}

/// Wrap an I/O failure with the path and operation that produced it
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> TilewaveError {
    TilewaveError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
