use std::{
    collections::VecDeque,
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use super::HistoryError;

/// One raw command line per row, oldest first.
pub struct FileOps {
    file_path: PathBuf,
}

impl FileOps {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Returns at most the newest `max_entries` rows.
    pub fn load_entries(&self, max_entries: usize) -> Result<VecDeque<String>, HistoryError> {
        let mut entries = VecDeque::new();

        if self.file_path.exists() {
            let file = File::open(&self.file_path)?;
            let reader = BufReader::new(file);

            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                entries.push_back(line);
                if entries.len() > max_entries {
                    entries.pop_front();
                }
            }
        }

        Ok(entries)
    }

    pub fn append_entry(&self, entry: &str) -> Result<(), HistoryError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)?;

        writeln!(file, "{}", entry)?;
        Ok(())
    }

    pub fn write_all<'a>(&self, entries: impl IntoIterator<Item = &'a String>) -> Result<(), HistoryError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.file_path)?);
        for entry in entries {
            writeln!(writer, "{}", entry)?;
        }
        writer.flush()?;
        Ok(())
    }
}
