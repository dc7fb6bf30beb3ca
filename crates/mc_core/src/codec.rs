//! CSV tokenizing and serialization for catalog grids.
//!
//! Reading is lenient about record width; the grid decides what to do with
//! ragged rows. Writing quotes only the fields that need it and ends every
//! record with `\n`.

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

pub fn read_rows(text: &str) -> Result<Vec<Vec<String>>, csv::Error> {
    let text = strip_bom(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub fn write_rows<R: AsRef<[String]>>(rows: &[R]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row.as_ref())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{feff}').unwrap_or(input)
}
