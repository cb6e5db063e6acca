use log::{debug, error, warn};

use crate::{
    Category, CreateError, DeleteError, Exercise, ExerciseRepository, ExerciseService,
    MuscleGroup, Name, ReadError, Settings, SettingsRepository, SettingsService,
    StatisticsRepository, StatisticsService, StatisticsSnapshot, Training, TrainingID,
    TrainingRepository, TrainingService, UpdateError, compute_statistics, exercise_library,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R>
where
    R: TrainingRepository + ExerciseRepository + SettingsRepository + StatisticsRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: StatisticsRepository> Service<R> {
    fn invalidate_statistics_cache(&self) {
        if let Err(err) = self.repository.write_statistics(None) {
            error!("failed to invalidate statistics: {err}");
        }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(_) => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: TrainingRepository + StatisticsRepository> TrainingService for Service<R> {
    fn get_trainings(&self) -> Result<Vec<Training>, ReadError> {
        log_on_error!(
            self.repository.read_trainings(),
            ReadError,
            "get",
            "trainings"
        )
    }

    fn create_training(&self, training: Training) -> Result<Training, CreateError> {
        let result = log_on_error!(
            self.repository.create_training(training),
            CreateError,
            "create",
            "training"
        );
        if result.is_ok() {
            self.invalidate_statistics_cache();
        }
        result
    }

    fn replace_training(&self, training: Training) -> Result<Training, UpdateError> {
        let result = log_on_error!(
            self.repository.replace_training(training),
            UpdateError,
            "replace",
            "training"
        );
        if result.is_ok() {
            self.invalidate_statistics_cache();
        }
        result
    }

    fn delete_training(&self, id: TrainingID) -> Result<TrainingID, DeleteError> {
        let result = log_on_error!(
            self.repository.delete_training(id),
            DeleteError,
            "delete",
            "training"
        );
        if result.is_ok() {
            self.invalidate_statistics_cache();
        }
        result
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository
                .read_exercises()
                .map(|exercises| exercise_library(&exercises)),
            ReadError,
            "get",
            "exercises"
        )
    }

    fn create_exercise(
        &self,
        name: Name,
        category: Category,
        muscles: Vec<MuscleGroup>,
    ) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository.create_exercise(Exercise {
                name,
                category,
                muscles,
                is_default: false,
            }),
            CreateError,
            "create",
            "exercise"
        )
    }

    fn replace_exercise(&self, name: &Name, exercise: Exercise) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.repository.replace_exercise(name, exercise),
            UpdateError,
            "replace",
            "exercise"
        )
    }

    fn delete_exercise(&self, name: &Name) -> Result<Name, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(name),
            DeleteError,
            "delete",
            "exercise"
        )
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    fn get_settings(&self) -> Settings {
        match self.repository.read_settings() {
            Ok(settings) => settings,
            Err(err) => {
                warn!("failed to get settings, using defaults: {err}");
                Settings::default()
            }
        }
    }

    fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError> {
        log_on_error!(
            self.repository.write_settings(settings),
            UpdateError,
            "set",
            "settings"
        )
    }
}

impl<R: TrainingRepository + StatisticsRepository> StatisticsService for Service<R> {
    fn get_statistics(&self) -> Result<StatisticsSnapshot, ReadError> {
        if let Some(statistics) = log_on_error!(
            self.repository.read_statistics(),
            ReadError,
            "get",
            "statistics"
        )? {
            return Ok(statistics);
        }

        match self.repository.refresh_statistics() {
            Ok(statistics) => {
                debug!(
                    "computed statistics for {} trainings",
                    statistics.total_trainings
                );
                Ok(statistics)
            }
            Err(err) => {
                error!("failed to store statistics: {err}");
                Ok(compute_statistics(&self.get_trainings()?))
            }
        }
    }

    fn invalidate_statistics(&self) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_statistics(None),
            UpdateError,
            "invalidate",
            "statistics"
        )
        .map(|_| ())
    }
}
