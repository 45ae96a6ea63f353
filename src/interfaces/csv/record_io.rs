use crate::domain::ports::{RawRecord, RecordKind};
use crate::error::{ParkingError, Result};
use std::io::{Read, Write};

/// Reads raw records of one kind from a CSV source.
///
/// The first line is the header and is skipped. Blank lines and rows with a
/// blank first field are ignored, as hand-edited record files tend to contain
/// them. Fields come back verbatim; passwords and names keep their spaces.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RecordReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields each data row as owned text fields.
    pub fn records(self) -> impl Iterator<Item = Result<RawRecord>> {
        self.reader
            .into_records()
            .map(|result| {
                result
                    .map(|record| record.iter().map(str::to_string).collect::<RawRecord>())
                    .map_err(ParkingError::from)
            })
            .filter(|result| match result {
                Ok(fields) => fields.first().is_some_and(|first| !first.trim().is_empty()),
                Err(_) => true,
            })
    }
}

/// Writes a header line followed by the given rows.
pub fn write_records<W: Write>(sink: W, kind: RecordKind, records: &[RawRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(kind.header())?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_skips_header_and_blank_rows() {
        let data = "SlotNumber,Type\nA01, 1\n\n ,1\nB01,0\n";
        let reader = RecordReader::new(data.as_bytes());
        let results: Vec<Result<RawRecord>> = reader.records().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &vec!["A01".to_string(), " 1".to_string()]);
        assert_eq!(results[1].as_ref().unwrap()[0], "B01");
    }

    #[test]
    fn test_writer_quotes_commas() {
        let mut out = Vec::new();
        let rows = vec![vec![
            "admin".to_string(),
            "pass123".to_string(),
            "Admin, User".to_string(),
            "0".to_string(),
        ]];
        write_records(&mut out, RecordKind::Users, &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Username,Password,FullName,Role\nadmin,pass123,\"Admin, User\",0\n"
        );

        let back: Vec<RawRecord> = RecordReader::new(text.as_bytes())
            .records()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(back, rows);
    }
}
