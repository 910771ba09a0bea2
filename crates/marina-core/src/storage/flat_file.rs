//! Line-oriented comma-separated data file.
//!
//! One record per line, no header. Saves go through a sibling temp file that
//! is renamed over the destination once fully written.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::traits::LedgerStore;
use crate::error::{LoadError, ParseError, SaveError};
use crate::fs::{rename_with_fallback, temp_path_for};
use crate::record::{BoatRecord, ParseMode};

/// A ledger stored in a flat comma-separated file.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
    mode: ParseMode,
}

impl FlatFileStore {
    /// Store at `path` using lenient parsing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: ParseMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }
}

/// Write one line per record, then flush and sync.
fn write_lines(file: File, records: &[BoatRecord]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", record.to_line())?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()
}

impl LedgerStore for FlatFileStore {
    fn load(&self, limit: usize) -> Result<Vec<BoatRecord>, LoadError> {
        let file = File::open(&self.path).map_err(|source| LoadError::CannotOpen {
            path: self.path.clone(),
            source,
        })?;

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_number = 0;
        let mut records = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| LoadError::Read {
                    path: self.path.clone(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_number += 1;
            if records.len() >= limit {
                warn!(limit, path = %self.path.display(), "capacity reached, ignoring remaining lines");
                break;
            }

            // Invalid UTF-8 stays confined to its own line.
            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                if self.mode.is_strict() {
                    return Err(LoadError::Malformed {
                        line: line_number,
                        source: ParseError::InvalidEncoding,
                    });
                }
                warn!(line = line_number, "invalid UTF-8 replaced in record");
            }
            if line.trim().is_empty() {
                continue;
            }

            match BoatRecord::parse_line(&line, self.mode) {
                Ok(record) => records.push(record),
                Err(source) if self.mode.is_strict() => {
                    return Err(LoadError::Malformed {
                        line: line_number,
                        source,
                    });
                }
                Err(err) => {
                    warn!(line = line_number, error = %err, "skipping unreadable record");
                }
            }
        }

        debug!(count = records.len(), path = %self.path.display(), "read records");
        Ok(records)
    }

    fn save(&self, records: &[BoatRecord]) -> Result<(), SaveError> {
        let temp = temp_path_for(&self.path);

        // `create_new` never opens a file that is already there.
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp)
            .map_err(|source| SaveError::CannotOpen {
                path: self.path.clone(),
                source,
            })?;

        if let Err(source) = write_lines(file, records) {
            let _ = fs::remove_file(&temp);
            return Err(SaveError::Write {
                path: self.path.clone(),
                source,
            });
        }

        rename_with_fallback(&temp, &self.path).map_err(|source| SaveError::CannotOpen {
            path: self.path.clone(),
            source,
        })?;

        debug!(count = records.len(), path = %self.path.display(), "wrote records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Placement;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn test_load_skips_blank_and_short_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        fs::write(&path, "Betty,20,slip,1,500.00\n\nbroken line\nPickle,12,storage,3,0\n").unwrap();

        let records = FlatFileStore::new(&path).load(120).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Betty", "Pickle"]);
    }

    #[test]
    fn test_load_accepts_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        fs::write(&path, "Betty,20,slip,1,500.00\r\n").unwrap();

        let records = FlatFileStore::new(&path).load(120).unwrap();
        assert_eq!(records[0].amount_owed(), dec!(500.00));
    }

    #[test]
    fn test_load_stops_at_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        let contents: String = (0..5)
            .map(|i| format!("Boat{},10,slip,{},0.00\n", i, i + 1))
            .collect();
        fs::write(&path, contents).unwrap();

        let records = FlatFileStore::new(&path).load(3).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_strict_load_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        fs::write(&path, "Betty,20,slip,1,500.00\nOops,20,dock,1,0\n").unwrap();

        let err = FlatFileStore::new(&path)
            .with_mode(ParseMode::Strict)
            .load(120)
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_save_writes_lines_and_removes_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        let records = vec![
            BoatRecord::new("Betty", 20, Placement::Slip { number: 1 }, dec!(500)),
            BoatRecord::new("Mermaid", 28, Placement::Trailer { license: "BRTRSH".into() }, dec!(0)),
        ];

        FlatFileStore::new(&path).save(&records).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Betty,20,slip,1,500.00\nMermaid,28,trailor,BRTRSH,0.00\n"
        );
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("boats.csv")]);
    }

    #[test]
    fn test_save_leaves_neighbouring_tmp_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        let neighbour = dir.path().join("boats.csv.tmp");
        fs::write(&neighbour, "notes").unwrap();

        FlatFileStore::new(&path).save(&[]).unwrap();

        assert_eq!(fs::read_to_string(&neighbour).unwrap(), "notes");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_lenient_load_survives_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        fs::write(
            &path,
            b"Betty,20,slip,1,500.00\nSe\xF1or,30,land,B,10.00\nZed,10,slip,2,5.00\n",
        )
        .unwrap();

        let records = FlatFileStore::new(&path).load(120).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].name(), "Se\u{FFFD}or");
        assert_eq!(records[1].amount_owed(), dec!(10.00));
        assert_eq!(records[2].name(), "Zed");
    }

    #[test]
    fn test_strict_load_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        fs::write(&path, b"Betty,20,slip,1,500.00\nSe\xF1or,30,land,B,10.00\n").unwrap();

        let err = FlatFileStore::new(&path)
            .with_mode(ParseMode::Strict)
            .load(120)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Malformed {
                line: 2,
                source: ParseError::InvalidEncoding
            }
        ));
    }

    #[test]
    fn test_save_into_missing_directory_cannot_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("boats.csv");

        let err = FlatFileStore::new(&path).save(&[]).unwrap_err();
        assert!(matches!(err, SaveError::CannotOpen { .. }));
    }
}
