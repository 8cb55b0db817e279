//! Row extraction and the output CSV dialect: `;` separated, every field double-quoted,
//! embedded quotes escaped as `\"`, CRLF line endings, no header. Nothing else is escaped, so
//! semicolons, backslashes and line breaks inside a field pass through as they are.

use std::io::Write;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use crate::db::Rows;
use crate::error::ReportError;

/// CSV writer configured for the report dialect.
pub fn csv_writer<W: Write>(w: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Always)
        .double_quote(false)
        .escape(b'\\')
        .terminator(Terminator::CRLF)
        .has_headers(false)
        .from_writer(w)
}

/// Formats a single row as one CSV line, terminator included.
pub fn format_line<I, T>(fields: I) -> Result<Vec<u8>, ReportError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = csv_writer(Vec::new());
    writer.write_record(fields)?;
    writer
        .into_inner()
        .map_err(|e| ReportError::Write(e.into_error().into()))
}

/// Streams every row of `rows` into `writer`, scanning `width` fields per row. Returns the
/// number of rows written. Lines written before a failure stay in the output.
pub fn extract<W: Write>(
    writer: &mut Writer<W>,
    rows: &mut dyn Rows,
    width: usize,
) -> Result<u64, ReportError> {
    let mut buf = vec![String::new(); width];
    let mut written = 0;
    while rows.scan(&mut buf)? {
        writer.write_record(&buf)?;
        written += 1;
    }
    writer.flush().map_err(|e| ReportError::Write(e.into()))?;
    Ok(written)
}
