use std::{
    cell::Cell,
    collections::VecDeque,
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

use crate::json_file::write_atomically;

/// Number of entries kept by [`FileLog`].
pub const MAX_ENTRIES: usize = 100;

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

#[allow(clippy::missing_errors_doc)]
pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

static LOGGER: Logger = Logger;

thread_local! {
    /// Set while the current thread writes an entry to the repository.
    static WRITING: Cell<bool> = const { Cell::new(false) };
}

/// Install the application logger.
///
/// Messages up to `level` are written to stderr and to `repository`.
///
/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(
    repository: Arc<Mutex<dyn Repository>>,
    level: LevelFilter,
) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = Entry {
            time: Local::now().format("%b %d %H:%M:%S").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        };

        eprintln!(
            "{} {:<5} {}: {}",
            entry.time,
            entry.level,
            record.target(),
            entry.message
        );

        let Some(repository) = LOG.lock().ok().and_then(|log| log.clone()) else {
            return;
        };

        // Messages logged by the repository itself only go to stderr.
        if WRITING.replace(true) {
            return;
        }
        if let Ok(repository) = repository.lock() {
            let _ = repository.write_entry(entry);
        }
        WRITING.set(false);
    }

    fn flush(&self) {}
}

/// Log entries stored as a JSON array, newest first.
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Repository for FileLog {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|err| Error::Unknown(err.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(VecDeque::new()),
            Err(err) => Err(Error::Unknown(err.to_string())),
        }
    }

    fn write_entry(&self, entry: Entry) -> Result<(), Error> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.push_front(entry);
        entries.truncate(MAX_ENTRIES);
        let content =
            serde_json::to_string(&entries).map_err(|err| Error::Unknown(err.to_string()))?;
        write_atomically(&self.path, content.as_bytes())
            .map_err(|err| Error::Unknown(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread, time::Duration};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct NoisyLog {
        entries: Mutex<VecDeque<Entry>>,
    }

    impl Repository for NoisyLog {
        fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
            self.entries
                .lock()
                .map(|entries| entries.clone())
                .map_err(|err| Error::Unknown(err.to_string()))
        }

        fn write_entry(&self, entry: Entry) -> Result<(), Error> {
            log::warn!("writing entry");
            self.entries
                .lock()
                .map(|mut entries| entries.push_front(entry))
                .map_err(|err| Error::Unknown(err.to_string()))
        }
    }

    /// Whether logging `message` on another thread returns in time.
    fn log_on_thread(message: &'static str) -> bool {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            log::error!("{message}");
            let _ = sender.send(());
        });
        receiver.recv_timeout(Duration::from_secs(5)).is_ok()
    }

    fn entry(message: &str) -> Entry {
        Entry {
            time: "Jan 01 10:00:00".to_string(),
            level: Level::Warn,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_entry_serde() {
        let serialized = json!(entry("foo"));
        assert_eq!(
            serialized,
            json!({"time": "Jan 01 10:00:00", "level": "Warn", "message": "foo"})
        );
        let deserialized: Entry = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, entry("foo"));
    }

    #[test]
    fn test_file_log_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(dir.path().join("log.json"));

        assert_eq!(log.read_entries(), Ok(VecDeque::new()));
    }

    #[test]
    fn test_file_log_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(dir.path().join("log.json"));

        log.write_entry(entry("first")).unwrap();
        log.write_entry(entry("second")).unwrap();

        assert_eq!(
            log.read_entries(),
            Ok(VecDeque::from([entry("second"), entry("first")]))
        );
    }

    #[test]
    fn test_file_log_keeps_last_entries() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(dir.path().join("log.json"));

        for i in 0..MAX_ENTRIES + 5 {
            log.write_entry(entry(&i.to_string())).unwrap();
        }

        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries.front(), Some(&entry(&(MAX_ENTRIES + 4).to_string())));
        assert_eq!(entries.back(), Some(&entry("5")));
    }

    #[test]
    fn test_file_log_replaces_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::write(&path, "not json").unwrap();
        let log = FileLog::new(path);

        assert!(log.read_entries().is_err());
        log.write_entry(entry("foo")).unwrap();
        assert_eq!(log.read_entries(), Ok(VecDeque::from([entry("foo")])));
    }

    #[test]
    fn test_file_log_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("entry"), "").unwrap();
        let log = FileLog::new(path);

        assert!(log.write_entry(entry("foo")).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_logger_with_failing_or_logging_repository() {
        let noisy = Arc::new(Mutex::new(NoisyLog::default()));
        init(noisy.clone(), LevelFilter::Warn).unwrap();

        assert!(log_on_thread("hello"));
        assert_eq!(
            noisy
                .lock()
                .unwrap()
                .read_entries()
                .unwrap()
                .into_iter()
                .map(|e| e.message)
                .filter(|m| m == "hello" || m == "writing entry")
                .collect::<Vec<_>>(),
            vec!["hello"]
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("entry"), "").unwrap();
        *LOG.lock().unwrap() = Some(Arc::new(Mutex::new(FileLog::new(path))));

        assert!(log_on_thread("unwritable"));
        assert!(log_on_thread("still unwritable"));

        *LOG.lock().unwrap() = None;
    }
}
