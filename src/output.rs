//! Delimited-text output of ranked compounds.
//!
//! The table has four columns, named after the configured descriptive fields:
//!
//! | Column | Content |
//! |--------|---------|
//! | compound id | Compound identifier |
//! | molecular weight | Calculated molecular weight, empty when unknown |
//! | name | Resolved display name, empty when unresolved |
//! | `Total Distance` | Aggregate corner distance |
//!
//! An empty result still produces the header row.

use std::io::Write;
use std::path::Path;

use log::info;

use crate::engine::RankedTable;
use crate::table::FieldNames;

/// Header of the distance column
pub const TOTAL_DISTANCE_COLUMN: &str = "Total Distance";

/// Errors that can occur while writing ranked output
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// I/O error writing the output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The finished temp file could not be moved into place
    #[error("Failed to persist output file: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

impl RankedTable {
    /// Header row for the given field names
    pub fn header(fields: &FieldNames) -> [&str; 4] {
        [
            fields.compound_id.as_str(),
            fields.molecular_weight.as_str(),
            fields.name.as_str(),
            TOTAL_DISTANCE_COLUMN,
        ]
    }

    /// Write the table as comma-separated text
    pub fn write_to<W: Write>(&self, writer: W, fields: &FieldNames) -> Result<(), OutputError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(Self::header(fields))?;
        for record in &self.records {
            let distance = record.total_distance.to_string();
            csv_writer.write_record([
                record.compound_id.as_str(),
                record.molecular_weight.as_deref().unwrap_or(""),
                record.name.as_deref().unwrap_or(""),
                distance.as_str(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the table to `path`, replacing it atomically
    pub fn write_csv<P: AsRef<Path>>(&self, path: P, fields: &FieldNames) -> Result<(), OutputError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        self.write_to(temp.as_file_mut(), fields)?;
        temp.as_file().sync_all()?;
        temp.persist(path)?;

        info!("Wrote {} ranked compounds to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RankedRecord;

    fn sample_table() -> RankedTable {
        RankedTable {
            records: vec![
                RankedRecord {
                    compound_id: "C1".to_string(),
                    molecular_weight: Some("180.06".to_string()),
                    name: Some("Glucose, D-".to_string()),
                    total_distance: 0.650515,
                },
                RankedRecord {
                    compound_id: "C2".to_string(),
                    molecular_weight: None,
                    name: None,
                    total_distance: 0.25,
                },
            ],
        }
    }

    #[test]
    fn test_write_to() {
        let mut buf = Vec::new();
        sample_table()
            .write_to(&mut buf, &FieldNames::default())
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Compounds ID,Calc. MW,Name,Total Distance\n\
             C1,180.06,\"Glucose, D-\",0.650515\n\
             C2,,,0.25\n"
        );
    }

    #[test]
    fn test_empty_table_writes_header() {
        let mut buf = Vec::new();
        RankedTable::default()
            .write_to(&mut buf, &FieldNames::default())
            .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Compounds ID,Calc. MW,Name,Total Distance\n"
        );
    }

    #[test]
    fn test_write_csv_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("by_distance_named.csv");
        std::fs::write(&path, "stale").unwrap();

        sample_table().write_csv(&path, &FieldNames::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Compounds ID,Calc. MW,Name,Total Distance\n"));
        assert!(text.contains("C2,,,0.25"));
    }
}
