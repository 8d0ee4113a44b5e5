//! Typed error hierarchy for the provisioning workflow.
//!
//! Two levels cover the two subsystems:
//! - `TrackerError` — a single remote call failed (non-success status or transport)
//! - `ProvisionError` — an item-level failure inside the orchestrator
//!   (resolution exhausted, missing prerequisite, local IO)

use thiserror::Error;

/// Errors from one call against the tracker API.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The remote answered with a status outside the operation's whitelist.
    /// Carries the raw body so the operator can see what the tracker complained about.
    #[error("{op} returned status {status}: {body}")]
    Remote {
        op: &'static str,
        status: u16,
        body: String,
    },

    #[error("transport failure during {op}: {source}")]
    Transport {
        op: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl TrackerError {
    /// Status code for `Remote` errors, `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrackerError::Remote { status, .. } => Some(*status),
            TrackerError::Transport { .. } => None,
        }
    }
}

/// Item-level errors inside a provisioning run. None of these abort the run;
/// the orchestrator records them in the summary and moves on.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("no usable field id for '{semantic}' on {kind} after trying {tried} candidate(s)")]
    ResolutionExhausted {
        semantic: String,
        kind: String,
        tried: usize,
    },

    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("local IO error at {path}: {source}")]
    LocalIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_carries_status_and_body() {
        let err = TrackerError::Remote {
            op: "create issue",
            status: 400,
            body: "{\"errors\":{\"summary\":\"required\"}}".to_string(),
        };
        assert_eq!(err.status(), Some(400));
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("create issue"));
        assert!(msg.contains("required"));
    }

    #[test]
    fn resolution_exhausted_is_matchable() {
        let err = ProvisionError::ResolutionExhausted {
            semantic: "epic link".to_string(),
            kind: "Story".to_string(),
            tried: 3,
        };
        match &err {
            ProvisionError::ResolutionExhausted { tried, .. } => assert_eq!(*tried, 3),
            _ => panic!("Expected ResolutionExhausted"),
        }
        assert!(err.to_string().contains("epic link"));
    }

    #[test]
    fn provision_error_converts_from_tracker_error() {
        let inner = TrackerError::Remote {
            op: "create sprint",
            status: 403,
            body: "forbidden".to_string(),
        };
        let err: ProvisionError = inner.into();
        match &err {
            ProvisionError::Tracker(TrackerError::Remote { status, .. }) => {
                assert_eq!(*status, 403);
            }
            _ => panic!("Expected ProvisionError::Tracker(Remote)"),
        }
    }

    #[test]
    fn missing_prerequisite_describes_itself() {
        let err = ProvisionError::MissingPrerequisite("no board for project PHON".to_string());
        assert!(err.to_string().contains("no board for project PHON"));
    }

    #[test]
    fn local_io_carries_path() {
        let err = ProvisionError::LocalIo {
            path: "/tmp/screenshot.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        match &err {
            ProvisionError::LocalIo { path, source } => {
                assert_eq!(path, std::path::Path::new("/tmp/screenshot.png"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected LocalIo"),
        }
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        let tracker = TrackerError::Remote {
            op: "update issue",
            status: 500,
            body: String::new(),
        };
        assert_std_error(&tracker);
        let provision = ProvisionError::MissingPrerequisite("x".into());
        assert_std_error(&provision);
    }
}
