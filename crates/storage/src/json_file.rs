use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use log::{debug, warn};
use serde::Deserialize;
use settracker_domain::{self as domain, StorageError};
use strum::AsRefStr;

use crate::{SCHEMA_VERSION, State, log::FileLog};

/// Files kept in the data directory.
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum File {
    #[strum(serialize = "state.json")]
    State,
    #[strum(serialize = "log.json")]
    Log,
}

/// Application state stored as a single JSON document.
///
/// The file is replaced atomically on every save. Modifications through
/// [`domain::DataStore::modify`] are serialized, so concurrent read-modify-write
/// cycles within one process do not overwrite each other.
pub struct JsonFile {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store in the platform data directory of the current user.
    #[must_use]
    pub fn in_data_dir() -> Option<Self> {
        directories::ProjectDirs::from("", "", "settracker")
            .map(|dirs| Self::new(dirs.data_dir()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path(&self, file: File) -> PathBuf {
        self.dir.join(file.as_ref())
    }

    /// Log repository stored next to the state file.
    #[must_use]
    pub fn log(&self) -> FileLog {
        FileLog::new(self.path(File::Log))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.lock
            .lock()
            .map_err(|err| StorageError::Other(err.to_string().into()))
    }

    fn read(&self) -> Result<domain::AppData, StorageError> {
        let path = self.path(File::State);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no state file at {}, using defaults", path.display());
                return Ok(domain::AppData::default());
            }
            Err(err) => return Err(err.into()),
        };

        let header: Header = serde_json::from_str(&content)
            .map_err(|err| StorageError::Corrupted(err.to_string()))?;
        if header.schema_version > SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchemaVersion(header.schema_version));
        }

        let state: State = serde_json::from_str(&content)
            .map_err(|err| StorageError::Corrupted(err.to_string()))?;
        domain::AppData::try_from(state).map_err(|err| StorageError::Corrupted(err.to_string()))
    }

    fn write(&self, data: &domain::AppData) -> Result<(), StorageError> {
        let path = self.path(File::State);
        let content = serde_json::to_string_pretty(&State::from(data))
            .map_err(|err| StorageError::Other(err.into()))?;
        if let Err(err) = write_atomically(&path, content.as_bytes()) {
            warn!("failed to replace {}: {err}", path.display());
            return Err(err.into());
        }
        debug!("saved state to {}", path.display());
        Ok(())
    }
}

impl domain::DataStore for JsonFile {
    fn load(&self) -> Result<domain::AppData, StorageError> {
        let _guard = self.lock()?;
        self.read()
    }

    fn save(&self, data: &domain::AppData) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.write(data)
    }

    fn modify<T, E: From<StorageError>>(
        &self,
        f: impl FnOnce(&mut domain::AppData) -> Result<T, E>,
    ) -> Result<T, E> {
        let _guard = self.lock()?;
        let mut data = self.read()?;
        let result = f(&mut data)?;
        self.write(&data)?;
        Ok(result)
    }
}

#[derive(Deserialize)]
struct Header {
    schema_version: u32,
}

/// Write to a uniquely named temporary file in the same directory and rename
/// it to `path`. The temporary file is removed if the rename fails.
///
/// Must not log, as the logger stores its entries through this function.
pub(crate) fn write_atomically(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
