//! CSV export of notification tables.

use refboard_core::Notification;

pub const NOTIFICATION_CSV_HEADER: [&str; 7] = [
    "ID",
    "Title",
    "Message",
    "Assigned To",
    "Date",
    "Status",
    "Recipients",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV flush failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render `rows` as CSV: one header line, `\n` line endings, and fields
/// quoted only when they contain a delimiter, quote or line break.
pub fn to_csv(rows: &[Notification]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer.write_record(NOTIFICATION_CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.id.to_string(),
            row.title.clone(),
            row.message.clone(),
            row.assigned_to.clone(),
            row.date.format("%Y-%m-%d").to_string(),
            row.status.as_str().to_string(),
            row.recipients.clone(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    let csv = String::from_utf8(bytes)?;
    tracing::debug!(rows = rows.len(), bytes = csv.len(), "notifications exported");
    Ok(csv)
}
