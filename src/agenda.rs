//! Agenda store
//!
//! An append-only log of timestamped free-text entries, one per line, read
//! back in insertion order.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::{Error, Result};

/// Render an entry the way it is stored, always on a single line
#[must_use]
pub fn format_entry(timestamp: DateTime<Local>, text: &str) -> String {
    format!(
        "[{}] Evento: {}",
        timestamp.format("%d/%m/%Y %H:%M"),
        text.trim().replace(['\n', '\r'], " ")
    )
}

/// Append-only agenda
pub trait AgendaStore {
    /// Append one entry stamped with `timestamp`
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written
    fn append(&self, timestamp: DateTime<Local>, text: &str) -> Result<()>;

    /// Every stored line, oldest first, blank lines skipped
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read
    fn read_all(&self) -> Result<Vec<String>>;

    /// Remove every entry
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be truncated
    fn clear(&self) -> Result<()>;
}

/// Agenda kept in a UTF-8 text file
#[derive(Debug, Clone)]
pub struct FileAgenda {
    path: PathBuf,
}

impl FileAgenda {
    /// Open the agenda at `path`, creating the file and its parent
    /// directory when missing
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::debug!(path = %path.display(), "agenda opened");
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AgendaStore for FileAgenda {
    fn append(&self, timestamp: DateTime<Local>, text: &str) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", format_entry(timestamp, text))?;
        tracing::info!(path = %self.path.display(), "agenda entry appended");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::Agenda(format!("failed to read {}: {e}", self.path.display()))
        })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    fn clear(&self) -> Result<()> {
        fs::write(&self.path, "")?;
        tracing::info!(path = %self.path.display(), "agenda cleared");
        Ok(())
    }
}

/// Agenda held in memory, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryAgenda {
    lines: RefCell<Vec<String>>,
}

impl MemoryAgenda {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgendaStore for MemoryAgenda {
    fn append(&self, timestamp: DateTime<Local>, text: &str) -> Result<()> {
        self.lines.borrow_mut().push(format_entry(timestamp, text));
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<String>> {
        Ok(self.lines.borrow().clone())
    }

    fn clear(&self) -> Result<()> {
        self.lines.borrow_mut().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry(at(9, 5), " dentista "),
            "[18/10/2026 09:05] Evento: dentista"
        );
    }

    #[test]
    fn test_file_agenda_preserves_order() {
        let dir = TempDir::new().unwrap();
        let agenda = FileAgenda::open(dir.path().join("data").join("agenda.txt")).unwrap();

        agenda.append(at(8, 0), "A").unwrap();
        agenda.append(at(9, 0), "B").unwrap();

        let lines = agenda.read_all().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("A"));
        assert!(lines[1].ends_with("B"));
    }

    #[test]
    fn test_multiline_text_stays_one_entry() {
        assert_eq!(
            format_entry(at(9, 5), "dentista\r\nàs dez"),
            "[18/10/2026 09:05] Evento: dentista  às dez"
        );

        let dir = TempDir::new().unwrap();
        let agenda = FileAgenda::open(dir.path().join("agenda.txt")).unwrap();
        agenda.append(at(8, 0), "linha um\nlinha dois").unwrap();
        agenda.append(at(9, 0), "B").unwrap();

        let lines = agenda.read_all().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[18/10/2026 08:00] Evento: linha um linha dois");
    }

    #[test]
    fn test_file_agenda_clear() {
        let dir = TempDir::new().unwrap();
        let agenda = FileAgenda::open(dir.path().join("agenda.txt")).unwrap();

        agenda.append(at(8, 0), "A").unwrap();
        agenda.clear().unwrap();

        assert!(agenda.read_all().unwrap().is_empty());
        assert!(agenda.path().exists());
    }

    #[test]
    fn test_file_agenda_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agenda.txt");
        fs::write(&path, "primeiro\n\n   \nsegundo\n").unwrap();

        let agenda = FileAgenda::open(&path).unwrap();
        assert_eq!(agenda.read_all().unwrap(), vec!["primeiro", "segundo"]);
    }

    #[test]
    fn test_memory_agenda() {
        let agenda = MemoryAgenda::new();
        agenda.append(at(8, 0), "A").unwrap();
        agenda.append(at(8, 1), "B").unwrap();
        assert_eq!(
            agenda.read_all().unwrap(),
            vec!["[18/10/2026 08:00] Evento: A", "[18/10/2026 08:01] Evento: B"]
        );
        agenda.clear().unwrap();
        assert!(agenda.read_all().unwrap().is_empty());
    }
}
