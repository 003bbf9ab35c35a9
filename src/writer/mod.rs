//! Output writers for timeline assignments
//!
//! Writers turn an [`Assignment`] into something a renderer can consume. They
//! never draw anything themselves.
//!
//! # Example
//!
//! ```rust,ignore
//! use chromaline::writer::{JsonWriter, Writer};
//!
//! let writer = JsonWriter::new();
//! let json = writer.write(&assignment)?;
//! ```

mod json;
mod text;

pub use json::JsonWriter;
pub use text::TextWriter;

use std::str::FromStr;

use crate::timeline::Assignment;
use crate::{ChromalineError, Result};

/// Trait for assignment writers
pub trait Writer {
    type Output;

    /// Render an assignment
    fn write(&self, assignment: &Assignment) -> Result<Self::Output>;

    /// Check an assignment can be rendered. Empty assignments can't.
    fn validate(&self, assignment: &Assignment) -> Result<()> {
        if assignment.is_empty() {
            return Err(ChromalineError::WriterError(
                "Assignment has no positions to write".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output formats, chosen with `--format` on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = ChromalineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(ChromalineError::WriterError(format!(
                "Unknown output format '{}' (expected json or text)",
                other
            ))),
        }
    }
}
