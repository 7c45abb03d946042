use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::Layer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const MAX_LOG_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Log to stdout and, when `log_file` is given, to a size-capped file.
pub fn init_logging(log_level: Level, log_file: Option<&str>) {
    let level_filter = LevelFilter::from_level(log_level);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_filter(level_filter);

    let file_layer = log_file.map(|path| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(CappedLogFile::new(path, MAX_LOG_FILE_BYTES))
            .with_filter(level_filter)
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

/// Append-only log file that drops its older half once it grows past `max_len`.
#[derive(Clone)]
pub struct CappedLogFile {
    path: PathBuf,
    max_len: u64,
    lock: Arc<Mutex<()>>,
}

impl CappedLogFile {
    pub fn new(path: impl Into<PathBuf>, max_len: u64) -> Self {
        Self {
            path: path.into(),
            max_len,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn keep_tail(path: &Path, keep_bytes: u64) -> io::Result<()> {
        let mut tail = Vec::new();
        {
            let mut file = File::open(path)?;
            let size = file.metadata()?.len();
            file.seek(SeekFrom::Start(size.saturating_sub(keep_bytes)))?;
            file.read_to_end(&mut tail)?;
        }
        // Restart on a line boundary
        if let Some(pos) = tail.iter().position(|b| *b == b'\n') {
            tail.drain(..=pos);
        }
        let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
        file.write_all(&tail)
    }
}

impl Write for CappedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A poisoned lock only means another writer panicked mid-line
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let len = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        if len >= self.max_len {
            Self::keep_tail(&self.path, self.max_len / 2)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CappedLogFile {
    type Writer = CappedLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
