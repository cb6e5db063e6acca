use std::{fmt, slice::Iter};

use chrono::NaiveDateTime;
use derive_more::{Deref, Display, Into};
use uuid::Uuid;

use crate::{
    Category, CreateError, DeleteError, Exercise, Name, ReadError, UpdateError, WeekCalendar,
    WeekGroup, group_by_week,
};

/// Number of previous trainings offered as a source for copying exercises.
pub const PREVIOUS_TRAININGS_LIMIT: usize = 20;

pub trait TrainingService {
    /// All trainings, newest first.
    fn get_trainings(&self) -> Result<Vec<Training>, ReadError>;
    fn create_training(&self, training: Training) -> Result<Training, CreateError>;
    fn replace_training(&self, training: Training) -> Result<Training, UpdateError>;
    fn delete_training(&self, id: TrainingID) -> Result<TrainingID, DeleteError>;

    fn get_training(&self, id: TrainingID) -> Result<Training, ReadError> {
        self.get_trainings()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(ReadError::NotFound)
    }

    fn get_trainings_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Training>, ReadError> {
        Ok(trainings_between(&self.get_trainings()?, start, end)
            .into_iter()
            .cloned()
            .collect())
    }

    #[must_use]
    fn group_by_week<'a>(
        &self,
        trainings: &'a [Training],
        calendar: WeekCalendar,
    ) -> Vec<WeekGroup<'a>> {
        group_by_week(trainings, calendar)
    }

    #[must_use]
    fn previous_trainings<'a>(&self, trainings: &'a [Training]) -> Vec<&'a Training> {
        previous_trainings(trainings, PREVIOUS_TRAININGS_LIMIT)
    }
}

pub trait TrainingRepository {
    fn read_trainings(&self) -> Result<Vec<Training>, ReadError>;
    fn create_training(&self, training: Training) -> Result<Training, CreateError>;
    fn replace_training(&self, training: Training) -> Result<Training, UpdateError>;
    fn delete_training(&self, id: TrainingID) -> Result<TrainingID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    pub id: TrainingID,
    pub date: NaiveDateTime,
    pub duration: Time,
    pub training_type: TrainingType,
    pub exercises: Vec<TrainingExercise>,
}

impl Training {
    #[must_use]
    pub fn new(date: NaiveDateTime) -> Self {
        Self {
            id: TrainingID::random(),
            date,
            duration: Time::default(),
            training_type: TrainingType::None,
            exercises: vec![],
        }
    }

    /// A training can be saved once its type is set and it contains an exercise.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.training_type.is_set() && !self.exercises.is_empty()
    }

    /// Append independent copies of all exercises of `source`.
    pub fn copy_exercises_from(&mut self, source: &Training) {
        self.exercises.extend(duplicate_exercises(&source.exercises));
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrainingID(Uuid);

impl TrainingID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TrainingID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TrainingID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrainingType {
    Strength,
    Cardio,
    Mobility,
    None,
    Unknown,
}

impl TrainingType {
    pub fn iter() -> Iter<'static, TrainingType> {
        static TRAINING_TYPES: [TrainingType; 4] = [
            TrainingType::Strength,
            TrainingType::Cardio,
            TrainingType::Mobility,
            TrainingType::None,
        ];
        TRAINING_TYPES.iter()
    }

    /// Types a user can pick for a training.
    pub fn iter_selectable() -> impl Iterator<Item = &'static TrainingType> {
        TrainingType::iter().filter(|t| t.is_set())
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TrainingType::Strength => "strength",
            TrainingType::Cardio => "cardio",
            TrainingType::Mobility => "mobility",
            TrainingType::None => "none",
            TrainingType::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn is_set(self) -> bool {
        !matches!(self, TrainingType::None | TrainingType::Unknown)
    }
}

impl From<&str> for TrainingType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "strength" => TrainingType::Strength,
            "cardio" => TrainingType::Cardio,
            "mobility" => TrainingType::Mobility,
            "" | "none" => TrainingType::None,
            _ => TrainingType::Unknown,
        }
    }
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExercise {
    pub id: TrainingExerciseID,
    pub exercise: Name,
    pub category: Category,
    pub duration: Time,
    pub sets: Vec<TrainingSet>,
}

impl TrainingExercise {
    pub const DEFAULT_CARDIO_DURATION: Time = Time(20 * 60);
    pub const DEFAULT_SETS: usize = 3;
    pub const DEFAULT_REPS: Reps = Reps(10);

    /// Prefill an entry for `exercise`.
    ///
    /// Cardio exercises carry their workload in the duration and get no sets.
    /// All other exercises start with three sets of ten reps without weight.
    #[must_use]
    pub fn from_exercise(exercise: &Exercise) -> Self {
        let (duration, sets) = if exercise.category.is_cardio() {
            (Self::DEFAULT_CARDIO_DURATION, vec![])
        } else {
            (
                Time::default(),
                (0..Self::DEFAULT_SETS)
                    .map(|_| TrainingSet::new(Self::DEFAULT_REPS, Weight::default()))
                    .collect(),
            )
        };
        Self {
            id: TrainingExerciseID::random(),
            exercise: exercise.name.clone(),
            category: exercise.category,
            duration,
            sets,
        }
    }

    /// Copy of this entry with fresh identities for the entry and all its sets.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: TrainingExerciseID::random(),
            exercise: self.exercise.clone(),
            category: self.category,
            duration: self.duration,
            sets: self.sets.iter().map(TrainingSet::duplicate).collect(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.category.is_cardio() || !self.sets.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        if self.category.is_cardio() {
            return format!("{} min", self.duration.minutes());
        }
        if self.sets.is_empty() {
            return "No sets configured".to_string();
        }
        let sample = self
            .sets
            .iter()
            .take(3)
            .map(|s| format!("{}x{}kg", s.reps, s.weight))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} sets • {sample}{}",
            self.sets.len(),
            if self.sets.len() > 3 { ", ..." } else { "" }
        )
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrainingExerciseID(Uuid);

impl TrainingExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TrainingExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TrainingExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub id: TrainingSetID,
    pub reps: Reps,
    pub weight: Weight,
}

impl TrainingSet {
    #[must_use]
    pub fn new(reps: Reps, weight: Weight) -> Self {
        Self {
            id: TrainingSetID::random(),
            reps,
            weight,
        }
    }

    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self::new(self.reps, self.weight)
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrainingSetID(Uuid);

impl TrainingSetID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TrainingSetID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TrainingSetID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(1..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 1 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Weight in kilograms.
#[derive(Debug, Default, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub fn new(value: f64) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.replace(',', ".").trim().parse::<f64>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Duration in seconds.
#[derive(Debug, Default, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(u32);

impl Time {
    pub const MAX: u32 = 24 * 60 * 60;

    pub fn new(value: u32) -> Result<Self, TimeError> {
        if value >= Self::MAX {
            return Err(TimeError::OutOfRange);
        }

        Ok(Self(value))
    }

    pub fn from_minutes(minutes: u32) -> Result<Self, TimeError> {
        Time::new(minutes.checked_mul(60).ok_or(TimeError::OutOfRange)?)
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        self.0 / 60
    }
}

impl TryFrom<&str> for Time {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Time::new(parsed_value),
            Err(_) => Err(TimeError::ParseError),
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Time must be less than 24 h")]
    OutOfRange,
    #[error("Time must be an integer")]
    ParseError,
}

/// Deep copy of `exercises` in which every entry and every set has a new identity.
#[must_use]
pub fn duplicate_exercises(exercises: &[TrainingExercise]) -> Vec<TrainingExercise> {
    exercises.iter().map(TrainingExercise::duplicate).collect()
}

/// Trainings that can serve as a source for copying exercises, newest first.
#[must_use]
pub fn previous_trainings(trainings: &[Training], limit: usize) -> Vec<&Training> {
    let mut result = trainings
        .iter()
        .filter(|t| !t.exercises.is_empty())
        .collect::<Vec<_>>();
    result.sort_by(|a, b| b.date.cmp(&a.date));
    result.truncate(limit);
    result
}

/// Trainings with `start <= date < end`, newest first.
#[must_use]
pub fn trainings_between(
    trainings: &[Training],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<&Training> {
    let mut result = trainings
        .iter()
        .filter(|t| t.date >= start && t.date < end)
        .collect::<Vec<_>>();
    result.sort_by(|a, b| b.date.cmp(&a.date));
    result
}
