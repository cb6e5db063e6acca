use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use settracker_domain as domain;
use uuid::Uuid;

/// Version of the state file layout written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct State {
    pub schema_version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub trainings: Vec<Training>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

impl From<&domain::AppData> for State {
    fn from(value: &domain::AppData) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            settings: Settings::from(&value.settings),
            trainings: value.trainings.iter().map(Training::from).collect(),
            exercises: value.exercises.iter().map(Exercise::from).collect(),
            statistics: value.statistics.as_ref().map(Statistics::from),
        }
    }
}

impl TryFrom<State> for domain::AppData {
    type Error = ConversionError;

    fn try_from(value: State) -> Result<Self, Self::Error> {
        Ok(Self {
            settings: domain::Settings::try_from(value.settings)?,
            trainings: value
                .trainings
                .into_iter()
                .map(domain::Training::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::Exercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            statistics: value.statistics.map(domain::StatisticsSnapshot::from),
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidReps(#[from] domain::RepsError),
    #[error(transparent)]
    InvalidWeight(#[from] domain::WeightError),
    #[error(transparent)]
    InvalidTime(#[from] domain::TimeError),
    #[error("invalid muscle group: {0}")]
    InvalidMuscle(String),
    #[error("invalid theme: {0}")]
    InvalidTheme(String),
    #[error("invalid weekday: {0}")]
    InvalidWeekday(u8),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: String,
    pub is_cloud_enabled: bool,
    pub time_exercises: bool,
    pub time_trainings: bool,
    /// Days from Monday.
    pub first_weekday: u8,
    pub min_days_in_first_week: u8,
    pub categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&domain::Settings::default())
    }
}

impl From<&domain::Settings> for Settings {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: &domain::Settings) -> Self {
        Self {
            theme: value.theme.name().to_string(),
            is_cloud_enabled: value.is_cloud_enabled,
            time_exercises: value.time_exercises,
            time_trainings: value.time_trainings,
            first_weekday: value.week_calendar.first_weekday.num_days_from_monday() as u8,
            min_days_in_first_week: value.week_calendar.min_days_in_first_week,
            categories: value
                .categories
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        }
    }
}

impl TryFrom<Settings> for domain::Settings {
    type Error = ConversionError;

    fn try_from(value: Settings) -> Result<Self, Self::Error> {
        Ok(Self {
            theme: domain::Theme::try_from(value.theme.as_str())
                .map_err(|_| ConversionError::InvalidTheme(value.theme.clone()))?,
            is_cloud_enabled: value.is_cloud_enabled,
            time_exercises: value.time_exercises,
            time_trainings: value.time_trainings,
            week_calendar: domain::WeekCalendar {
                first_weekday: Weekday::try_from(value.first_weekday)
                    .map_err(|_| ConversionError::InvalidWeekday(value.first_weekday))?,
                min_days_in_first_week: value.min_days_in_first_week.clamp(1, 7),
            },
            categories: value
                .categories
                .iter()
                .map(|c| domain::Category::from(c.as_str()))
                .collect(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Training {
    pub id: Uuid,
    pub date: NaiveDateTime,
    /// Seconds.
    pub duration: u32,
    pub training_type: String,
    pub exercises: Vec<TrainingExercise>,
}

impl From<&domain::Training> for Training {
    fn from(value: &domain::Training) -> Self {
        Self {
            id: *value.id,
            date: value.date,
            duration: u32::from(value.duration),
            training_type: value.training_type.name().to_string(),
            exercises: value.exercises.iter().map(TrainingExercise::from).collect(),
        }
    }
}

impl TryFrom<Training> for domain::Training {
    type Error = ConversionError;

    fn try_from(value: Training) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            date: value.date,
            duration: domain::Time::new(value.duration)?,
            training_type: domain::TrainingType::from(value.training_type.as_str()),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::TrainingExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingExercise {
    pub id: Uuid,
    pub exercise: String,
    pub category: String,
    /// Seconds.
    pub duration: u32,
    pub sets: Vec<TrainingSet>,
}

impl From<&domain::TrainingExercise> for TrainingExercise {
    fn from(value: &domain::TrainingExercise) -> Self {
        Self {
            id: *value.id,
            exercise: value.exercise.to_string(),
            category: value.category.name().to_string(),
            duration: u32::from(value.duration),
            sets: value.sets.iter().map(TrainingSet::from).collect(),
        }
    }
}

impl TryFrom<TrainingExercise> for domain::TrainingExercise {
    type Error = ConversionError;

    fn try_from(value: TrainingExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            exercise: domain::Name::new(&value.exercise)?,
            category: domain::Category::from(value.category.as_str()),
            duration: domain::Time::new(value.duration)?,
            sets: value
                .sets
                .into_iter()
                .map(domain::TrainingSet::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub id: Uuid,
    pub reps: u32,
    /// Kilograms.
    pub weight: f64,
}

impl From<&domain::TrainingSet> for TrainingSet {
    fn from(value: &domain::TrainingSet) -> Self {
        Self {
            id: *value.id,
            reps: u32::from(value.reps),
            weight: f64::from(value.weight),
        }
    }
}

impl TryFrom<TrainingSet> for domain::TrainingSet {
    type Error = ConversionError;

    fn try_from(value: TrainingSet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            reps: domain::Reps::new(value.reps)?,
            weight: domain::Weight::new(value.weight)?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub category: String,
    pub muscles: Vec<String>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            name: value.name.to_string(),
            category: value.category.name().to_string(),
            muscles: value
                .muscles
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = ConversionError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            name: domain::Name::new(&value.name)?,
            category: domain::Category::from(value.category.as_str()),
            muscles: value
                .muscles
                .into_iter()
                .map(|m| {
                    domain::MuscleGroup::from_name(&m).ok_or(ConversionError::InvalidMuscle(m))
                })
                .collect::<Result<Vec<_>, _>>()?,
            is_default: false,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_trainings: usize,
    pub avg_trainings_per_week: f64,
    pub type_percentages: BTreeMap<String, f64>,
    pub split_percentages: BTreeMap<String, f64>,
    pub last_computed: DateTime<Utc>,
}

impl From<&domain::StatisticsSnapshot> for Statistics {
    fn from(value: &domain::StatisticsSnapshot) -> Self {
        Self {
            total_trainings: value.total_trainings,
            avg_trainings_per_week: value.avg_trainings_per_week,
            type_percentages: value
                .type_percentages
                .iter()
                .map(|(t, p)| (t.name().to_string(), *p))
                .collect(),
            split_percentages: value
                .split_percentages
                .iter()
                .map(|(c, p)| (c.name().to_string(), *p))
                .collect(),
            last_computed: value.last_computed,
        }
    }
}

impl From<Statistics> for domain::StatisticsSnapshot {
    fn from(value: Statistics) -> Self {
        Self {
            total_trainings: value.total_trainings,
            avg_trainings_per_week: value.avg_trainings_per_week,
            type_percentages: value
                .type_percentages
                .iter()
                .map(|(t, p)| (domain::TrainingType::from(t.as_str()), *p))
                .filter(|(t, _)| *t != domain::TrainingType::Unknown)
                .collect(),
            split_percentages: value
                .split_percentages
                .iter()
                .map(|(c, p)| (domain::Category::from(c.as_str()), *p))
                .filter(|(c, _)| *c != domain::Category::Unknown)
                .collect(),
            last_computed: value.last_computed,
        }
    }
}
