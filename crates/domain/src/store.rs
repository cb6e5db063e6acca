use std::sync::Mutex;

use crate::{
    CreateError, DeleteError, Exercise, ExerciseRepository, Name, ReadError, Settings,
    SettingsRepository, StatisticsRepository, StatisticsSnapshot, StorageError, Training,
    TrainingID, TrainingRepository, UpdateError, catalog, compute_statistics,
};

/// Everything the application persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppData {
    pub settings: Settings,
    pub trainings: Vec<Training>,
    /// User-defined exercises. The built-in catalog is not stored.
    pub exercises: Vec<Exercise>,
    /// Cached result of the last statistics computation.
    pub statistics: Option<StatisticsSnapshot>,
}

/// Persistence of the complete application state.
///
/// All repositories are implemented on top of this trait.
pub trait DataStore {
    fn load(&self) -> Result<AppData, StorageError>;
    fn save(&self, data: &AppData) -> Result<(), StorageError>;

    /// Load the data, apply `f` and save the result if `f` succeeds.
    fn modify<T, E: From<StorageError>>(
        &self,
        f: impl FnOnce(&mut AppData) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut data = self.load()?;
        let result = f(&mut data)?;
        self.save(&data)?;
        Ok(result)
    }
}

/// Volatile store, used when no persistent storage is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<AppData>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(data: AppData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl DataStore for MemoryStore {
    fn load(&self) -> Result<AppData, StorageError> {
        self.data
            .lock()
            .map(|data| data.clone())
            .map_err(|err| StorageError::Other(err.to_string().into()))
    }

    fn save(&self, data: &AppData) -> Result<(), StorageError> {
        let mut guard = self
            .data
            .lock()
            .map_err(|err| StorageError::Other(err.to_string().into()))?;
        *guard = data.clone();
        Ok(())
    }

    /// Apply `f` while holding the lock, so that concurrent modifications are
    /// serialized.
    fn modify<T, E: From<StorageError>>(
        &self,
        f: impl FnOnce(&mut AppData) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut guard = self
            .data
            .lock()
            .map_err(|err| StorageError::Other(err.to_string().into()))?;
        let mut data = guard.clone();
        let result = f(&mut data)?;
        *guard = data;
        Ok(result)
    }
}

impl<S: DataStore> TrainingRepository for S {
    fn read_trainings(&self) -> Result<Vec<Training>, ReadError> {
        let mut trainings = self.load()?.trainings;
        trainings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(trainings)
    }

    fn create_training(&self, training: Training) -> Result<Training, CreateError> {
        self.modify(|data| {
            if data.trainings.iter().any(|t| t.id == training.id) {
                return Err(CreateError::Conflict);
            }
            data.trainings.push(training.clone());
            Ok(training)
        })
    }

    fn replace_training(&self, training: Training) -> Result<Training, UpdateError> {
        self.modify(|data| {
            let Some(stored) = data.trainings.iter_mut().find(|t| t.id == training.id) else {
                return Err(UpdateError::NotFound);
            };
            *stored = training.clone();
            Ok(training)
        })
    }

    fn delete_training(&self, id: TrainingID) -> Result<TrainingID, DeleteError> {
        self.modify(|data| {
            let Some(index) = data.trainings.iter().position(|t| t.id == id) else {
                return Err(DeleteError::NotFound);
            };
            data.trainings.remove(index);
            Ok(id)
        })
    }
}

impl<S: DataStore> ExerciseRepository for S {
    fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        Ok(self.load()?.exercises)
    }

    fn create_exercise(&self, exercise: Exercise) -> Result<Exercise, CreateError> {
        self.modify(|data| {
            if name_is_taken(&data.exercises, &exercise.name, None) {
                return Err(CreateError::Conflict);
            }
            let exercise = Exercise {
                is_default: false,
                ..exercise
            };
            data.exercises.push(exercise.clone());
            Ok(exercise)
        })
    }

    fn replace_exercise(&self, name: &Name, exercise: Exercise) -> Result<Exercise, UpdateError> {
        self.modify(|data| {
            let Some(index) = data.exercises.iter().position(|e| e.name.matches(name)) else {
                return Err(UpdateError::NotFound);
            };
            if name_is_taken(&data.exercises, &exercise.name, Some(index)) {
                return Err(UpdateError::Conflict);
            }
            let exercise = Exercise {
                is_default: false,
                ..exercise
            };
            data.exercises[index] = exercise.clone();
            Ok(exercise)
        })
    }

    fn delete_exercise(&self, name: &Name) -> Result<Name, DeleteError> {
        self.modify(|data| {
            let Some(index) = data.exercises.iter().position(|e| e.name.matches(name)) else {
                return Err(DeleteError::NotFound);
            };
            Ok(data.exercises.remove(index).name)
        })
    }
}

/// Whether `name` is used by a catalog exercise or by a user exercise other
/// than the one at `ignore`.
fn name_is_taken(exercises: &[Exercise], name: &Name, ignore: Option<usize>) -> bool {
    catalog::EXERCISES
        .iter()
        .any(|e| e.name.to_lowercase() == name.to_string().to_lowercase())
        || exercises
            .iter()
            .enumerate()
            .any(|(i, e)| Some(i) != ignore && e.name.matches(name))
}

impl<S: DataStore> SettingsRepository for S {
    fn read_settings(&self) -> Result<Settings, ReadError> {
        Ok(self.load()?.settings)
    }

    fn write_settings(&self, settings: Settings) -> Result<Settings, UpdateError> {
        self.modify(|data| {
            data.settings = settings.clone();
            Ok(settings)
        })
    }
}

impl<S: DataStore> StatisticsRepository for S {
    fn read_statistics(&self) -> Result<Option<StatisticsSnapshot>, ReadError> {
        Ok(self.load()?.statistics)
    }

    fn write_statistics(
        &self,
        statistics: Option<StatisticsSnapshot>,
    ) -> Result<Option<StatisticsSnapshot>, UpdateError> {
        self.modify(|data| {
            data.statistics = statistics.clone();
            Ok(statistics)
        })
    }

    fn refresh_statistics(&self) -> Result<StatisticsSnapshot, UpdateError> {
        self.modify(|data| {
            let statistics = compute_statistics(&data.trainings);
            data.statistics = Some(statistics.clone());
            Ok(statistics)
        })
    }
}
