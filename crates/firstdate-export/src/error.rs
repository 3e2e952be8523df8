use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Exporting is disabled until at least one response is loaded.
    #[error("no responses to export")]
    NoRecords,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("CSV write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
