use crate::error::IoFailure;
use crate::sink::Sink;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends lines to a file, rotating to numbered backups when a size
/// threshold would be exceeded.
///
/// Backups live at `<path>.1` .. `<path>.<max_backup_count>`, newest first;
/// the file beyond the cap is deleted on rotation. A `max_backup_count` of
/// zero truncates the active file with no history.
///
/// All writers serialize through one mutex per sink instance; rotation and
/// the write that triggered it happen as one atomic unit.
pub struct RollingFileSink {
    path: PathBuf,
    max_file_size: u64,
    max_backup_count: u32,
    immediate_flush: bool,
    active: Mutex<ActiveFile>,
}

struct ActiveFile {
    writer: BufWriter<File>,
    size: u64,
}

impl RollingFileSink {
    /// Opens the active file in append mode, creating parent directories
    /// when absent.
    pub fn new(
        path: &Path,
        max_file_size: u64,
        max_backup_count: u32,
        immediate_flush: bool,
    ) -> io::Result<RollingFileSink> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata()?.len();
        Ok(RollingFileSink {
            path: path.to_owned(),
            max_file_size,
            max_backup_count,
            immediate_flush,
            active: Mutex::new(ActiveFile {
                writer: BufWriter::new(file),
                size,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn open_active(&self, truncate: bool) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(!truncate)
            .write(truncate)
            .truncate(truncate)
            .open(&self.path)
    }

    /// Shifts backups upward, renames the active file to `.1` and opens a
    /// fresh one. The caller holds the sink lock.
    fn rotate(&self, active: &mut ActiveFile) -> io::Result<()> {
        active.writer.flush()?;

        if self.max_backup_count == 0 {
            active.writer = BufWriter::new(self.open_active(true)?);
            active.size = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.max_backup_count);
        match fs::remove_file(&oldest) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        for index in (1..self.max_backup_count).rev() {
            let from = self.backup_path(index);
            match fs::rename(&from, self.backup_path(index + 1)) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        active.writer = BufWriter::new(self.open_active(false)?);
        active.size = 0;
        Ok(())
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());

        let incoming = line.len() as u64;
        // A line larger than the threshold still lands, in a fresh file;
        // an empty active file is never rotated.
        if active.size > 0 && active.size + incoming > self.max_file_size {
            self.rotate(&mut active)?;
        }
        active.writer.write_all(line.as_bytes())?;
        active.size += incoming;
        if self.immediate_flush {
            active.writer.flush()?;
            active.writer.get_ref().sync_data()?;
        }
        Ok(())
    }
}

impl Sink for RollingFileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn write(&self, line: &str) -> Result<(), IoFailure> {
        self.write_line(line)
            .map_err(|err| IoFailure::new(self.name(), err))
    }

    fn flush(&self) -> Result<(), IoFailure> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active
            .writer
            .flush()
            .and_then(|()| active.writer.get_ref().sync_data())
            .map_err(|err| IoFailure::new(self.name(), err))
    }
}
