//! Document loading and format detection
//!
//! Reads workflow documents from disk (JSON or YAML), auto-detects whether
//! each one is a definition or an execution trace, and decodes them into
//! the core's typed models. A definition and its paired trace are read
//! concurrently and joined before the core is invoked, so the merge never
//! starts on a half-loaded pair.

use flowsight::{ExecutionTrace, WorkflowDefinition};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading workflow documents
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading the file failed
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is neither valid JSON nor valid YAML
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Path that could not be parsed
        path: PathBuf,
        /// Parser diagnostics
        message: String,
    },

    /// The document shape matches neither a definition nor a trace
    #[error("Cannot tell whether {path} is a workflow definition or an execution trace. A definition declares 'start' and typed 'states'; a trace records states with 'startTime'")]
    AmbiguousDocument {
        /// Path of the ambiguous document
        path: PathBuf,
    },

    /// Two documents of the same kind were supplied
    #[error("Both {first} and {second} look like the same kind of document; expected one definition and one trace")]
    DuplicateKind {
        /// First document path
        first: PathBuf,
        /// Second document path
        second: PathBuf,
    },

    /// A trace was supplied without a definition to merge it into
    #[error("{path} is an execution trace; a workflow definition is required to lay it out")]
    MissingDefinition {
        /// Path of the lone trace
        path: PathBuf,
    },

    /// The document detected as a given kind failed typed decoding
    #[error("Failed to decode {path} as a {kind}: {source}")]
    Decode {
        /// Path that failed to decode
        path: PathBuf,
        /// Detected document kind
        kind: DocumentKind,
        /// Underlying decode error
        source: serde_json::Error,
    },
}

/// What kind of workflow document a file contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A workflow definition
    Definition,
    /// An execution trace
    Trace,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Definition => write!(f, "workflow definition"),
            DocumentKind::Trace => write!(f, "execution trace"),
        }
    }
}

/// A loaded, kind-detected, but not yet typed document
#[derive(Debug)]
pub struct Document {
    /// Where the document came from
    pub path: PathBuf,
    /// Detected kind
    pub kind: DocumentKind,
    /// Decoded document body
    pub value: Value,
}

/// Load one or two documents and return the typed definition/trace pair
///
/// With a single path, it must be a definition. With two paths, one must be
/// a definition and the other a trace, in either order; both files are read
/// and parsed concurrently and joined here.
pub async fn load_pair(
    paths: &[PathBuf],
) -> Result<(WorkflowDefinition, Option<ExecutionTrace>), DocumentError> {
    match paths {
        [single] => {
            let document = load_document(single).await?;
            match document.kind {
                DocumentKind::Definition => Ok((decode_definition(document)?, None)),
                DocumentKind::Trace => Err(DocumentError::MissingDefinition {
                    path: single.clone(),
                }),
            }
        }
        [first, second] => {
            let (a, b) = tokio::try_join!(load_document(first), load_document(second))?;
            match (a.kind, b.kind) {
                (DocumentKind::Definition, DocumentKind::Trace) => {
                    Ok((decode_definition(a)?, Some(decode_trace(b)?)))
                }
                (DocumentKind::Trace, DocumentKind::Definition) => {
                    Ok((decode_definition(b)?, Some(decode_trace(a)?)))
                }
                _ => Err(DocumentError::DuplicateKind {
                    first: first.clone(),
                    second: second.clone(),
                }),
            }
        }
        _ => unreachable!("clap limits the argument count to 1..=2"),
    }
}

/// Read and parse one document, detecting its kind from its shape
pub async fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let value = parse_content(path, &content)?;
    let kind = detect_kind(&value).ok_or_else(|| DocumentError::AmbiguousDocument {
        path: path.to_path_buf(),
    })?;

    tracing::debug!(path = %path.display(), %kind, "loaded document");
    Ok(Document {
        path: path.to_path_buf(),
        kind,
        value,
    })
}

/// Parse a document body as JSON, or as YAML for .yaml/.yml files
fn parse_content(path: &Path, content: &str) -> Result<Value, DocumentError> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let parsed = if is_yaml {
        serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| DocumentError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Detect whether a decoded document is a definition or a trace
///
/// A definition declares `start` or states carrying a `type`; a trace
/// records states carrying `startTime`. Anything else is ambiguous and
/// refused rather than guessed.
pub fn detect_kind(value: &Value) -> Option<DocumentKind> {
    let object = value.as_object()?;

    let states = object.get("states").and_then(Value::as_array);
    if let Some(states) = states {
        if states
            .iter()
            .any(|s| s.get("startTime").is_some() || s.get("endTime").is_some())
        {
            return Some(DocumentKind::Trace);
        }
    }

    if object.get("start").is_some() {
        return Some(DocumentKind::Definition);
    }
    if let Some(states) = states {
        if states.iter().any(|s| s.get("type").is_some()) {
            return Some(DocumentKind::Definition);
        }
    }

    None
}

fn decode_definition(document: Document) -> Result<WorkflowDefinition, DocumentError> {
    serde_json::from_value(document.value).map_err(|source| DocumentError::Decode {
        path: document.path,
        kind: DocumentKind::Definition,
        source,
    })
}

fn decode_trace(document: Document) -> Result<ExecutionTrace, DocumentError> {
    serde_json::from_value(document.value).map_err(|source| DocumentError::Decode {
        path: document.path,
        kind: DocumentKind::Trace,
        source,
    })
}
