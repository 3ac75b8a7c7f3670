use std::io::Write;

use thiserror::Error;

use crate::entities::document::ReportDocument;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The format could not lay the document out
    #[error("Render error: {0}")]
    Render(String),
}

/// Turns a report document into bytes of one output format
pub trait ReportExporter {
    /// Short format name, e.g. "json"
    fn format_name(&self) -> &'static str;

    /// Render the document
    fn export(&self, document: &ReportDocument) -> Result<Vec<u8>, ExportError>;

    /// Render the document into `writer`
    fn write_to(&self, document: &ReportDocument, writer: &mut dyn Write) -> Result<(), ExportError> {
        let bytes = self.export(document)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}
