//! Error taxonomy shared by fetchers, the evaluation distributor and the renderers.
//!
//! Each variant maps to one failure class with a fixed batch behaviour:
//!
//! - `UpstreamUnavailable`: a reference source has no data or could not be
//!   reached. Recorded as absence; the batch continues.
//! - `MalformedFile`: a hand-edited file does not parse. Fatal for that single
//!   record, reported with its path; the batch continues.
//! - `UnknownTask` / `SchemaMismatch`: a file uses keys the reader does not
//!   know. Readers degrade to placeholders where they can and report otherwise.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LandscapeError {
    #[error("{source_name} has no data for '{key}': {reason}")]
    UpstreamUnavailable {
        source_name: String,
        key: String,
        reason: String,
    },

    #[error("malformed file {}: {message}", path.display())]
    MalformedFile { path: PathBuf, message: String },

    #[error("unknown task type '{task}' in {}", path.display())]
    UnknownTask { task: String, path: PathBuf },

    #[error("schema mismatch in {}: {message}", path.display())]
    SchemaMismatch { path: PathBuf, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document conversion failed: {0}")]
    Conversion(String),
}

impl LandscapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedFile {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn upstream(
        source_name: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UpstreamUnavailable {
            source_name: source_name.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure only means "no data here" rather than a broken input.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }
}

pub type LandscapeResult<T> = std::result::Result<T, LandscapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_path() {
        let err = LandscapeError::malformed("Research/Actors/masakhane.yaml", "bad indent");
        let msg = err.to_string();
        assert!(msg.contains("Research/Actors/masakhane.yaml"));
        assert!(msg.contains("bad indent"));
    }

    #[test]
    fn test_unknown_task_message() {
        let err = LandscapeError::UnknownTask {
            task: "summarization".to_string(),
            path: PathBuf::from("Evaluations/paper.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "unknown task type 'summarization' in Evaluations/paper.yaml"
        );
    }

    #[test]
    fn test_is_absence() {
        assert!(LandscapeError::upstream("Wikipedia", "wol", "HTTP 404").is_absence());
        assert!(!LandscapeError::malformed("x.yaml", "oops").is_absence());
        assert!(!LandscapeError::Conversion("pandoc missing".into()).is_absence());
    }
}
