//! Error types for exchange-format operations.

use thiserror::Error;

/// Errors that can occur while reading or writing an exchange document.
///
/// Import errors are fatal: the importer surfaces the first error it
/// encounters and returns no partial model. The exporter only reports
/// transport (`Xml`/`Io`) errors; it does not validate its input model.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// XML parsing or serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required document section is absent.
    #[error("missing required section: {0}")]
    MissingRequiredSection(&'static str),

    /// A type attribute is present but names no known concept kind.
    #[error("unknown concept type: {0}")]
    UnknownConceptType(String),

    /// An id attribute does not resolve to any parsed entity.
    #[error("dangling {kind} reference: {id}")]
    DanglingReference {
        kind: &'static str,
        id: String,
    },

    /// A coordinate attribute is absent or not a number.
    #[error("missing coordinate on {0}")]
    MissingCoordinate(&'static str),

    /// A color element lacks one of its r/g/b components.
    #[error("missing color component")]
    MissingColorComponent,
}

impl ExchangeError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a dangling-reference error for the given lookup kind.
    pub fn dangling(kind: &'static str, id: impl Into<String>) -> Self {
        Self::DanglingReference {
            kind,
            id: id.into(),
        }
    }
}
