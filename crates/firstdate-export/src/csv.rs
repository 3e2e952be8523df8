//! CSV rendering of the response table.

use csv_async::{AsyncWriterBuilder, QuoteStyle, Terminator};
use jiff::civil::Date;

use firstdate_core::document::Document;

use crate::error::ExportError;
use crate::table::{self, ResponseTable};

pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// `questionnaire-responses-YYYY-MM-DD.csv`
pub fn file_name(date: Date) -> String {
    format!("questionnaire-responses-{date}.csv")
}

/// Every value quoted, embedded quotes doubled, `\n` line endings.
pub async fn write_table(table: &ResponseTable) -> Result<String, ExportError> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut writer = AsyncWriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .create_writer(&mut buf);
        writer.write_record(&table.columns).await?;
        for row in &table.rows {
            writer.write_record(row).await?;
        }
        writer.flush().await?;
    }
    let mut out = String::from_utf8(buf)?;
    // Rows are joined, not terminated.
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Render loaded records. Refuses when there is nothing to export.
pub async fn to_csv(records: &[Document]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }
    let table = table::tabulate(records);
    let csv = write_table(&table).await?;
    tracing::info!(rows = table.len(), columns = table.columns.len(), "rendered CSV export");
    Ok(csv)
}
