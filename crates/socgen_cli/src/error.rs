//! Errors raised by the build driver.

use std::io;
use std::path::PathBuf;

use socgen_bd::BdError;
use socgen_config::ConfigError;

/// Errors from loading inputs, preparing the output directory, or running Vivado.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A settings or design file could not be loaded.
    #[error("{}: {source}", .path.display())]
    Load {
        /// The file being loaded.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: ConfigError,
    },

    /// The design description does not resolve.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Interconnect or address allocation failed.
    #[error(transparent)]
    Bd(#[from] BdError),

    /// A file system operation in the output or working directory failed.
    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        /// What the driver was doing.
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The tool could not be started or waited on.
    #[error("failed to run '{program}': {source}")]
    Launch {
        /// The executable.
        program: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl DriverError {
    /// Wraps an I/O error with the action and path it happened on.
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| DriverError::Io {
            action,
            path,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_display() {
        let err = DriverError::io("copy", "/work/rtl/soc.v")(io::Error::new(
            io::ErrorKind::NotFound,
            "not found",
        ));
        assert_eq!(err.to_string(), "failed to copy '/work/rtl/soc.v': not found");
    }

    #[test]
    fn load_display_names_file() {
        let err = DriverError::Load {
            path: PathBuf::from("configuration.json"),
            source: ConfigError::MissingField("part_name".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("configuration.json: "));
        assert!(msg.contains("part_name"));
    }

    #[test]
    fn launch_display() {
        let err = DriverError::Launch {
            program: "vivado".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "failed to run 'vivado': no such file");
    }
}
