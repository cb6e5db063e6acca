use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{Category, ReadError, Training, TrainingType, UpdateError};

pub trait StatisticsService {
    /// The cached snapshot, or a freshly computed one if nothing is cached.
    fn get_statistics(&self) -> Result<StatisticsSnapshot, ReadError>;
    /// Drop the cached snapshot so that the next read recomputes it.
    fn invalidate_statistics(&self) -> Result<(), UpdateError>;

    #[must_use]
    fn compute_statistics(&self, trainings: &[Training]) -> StatisticsSnapshot {
        compute_statistics(trainings)
    }
}

pub trait StatisticsRepository {
    fn read_statistics(&self) -> Result<Option<StatisticsSnapshot>, ReadError>;
    fn write_statistics(
        &self,
        statistics: Option<StatisticsSnapshot>,
    ) -> Result<Option<StatisticsSnapshot>, UpdateError>;
    /// Compute the statistics of the stored trainings and cache the result.
    ///
    /// Reading the trainings and storing the snapshot form one step, so a
    /// concurrent invalidation is never overwritten by an outdated snapshot.
    fn refresh_statistics(&self) -> Result<StatisticsSnapshot, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsSnapshot {
    pub total_trainings: usize,
    pub avg_trainings_per_week: f64,
    pub type_percentages: BTreeMap<TrainingType, f64>,
    pub split_percentages: BTreeMap<Category, f64>,
    pub last_computed: DateTime<Utc>,
}

#[must_use]
pub fn compute_statistics(trainings: &[Training]) -> StatisticsSnapshot {
    compute_statistics_at(trainings, Utc::now())
}

#[must_use]
pub fn compute_statistics_at(trainings: &[Training], now: DateTime<Utc>) -> StatisticsSnapshot {
    StatisticsSnapshot {
        total_trainings: trainings.len(),
        avg_trainings_per_week: avg_trainings_per_week(trainings),
        type_percentages: type_percentages(trainings),
        split_percentages: split_percentages(trainings),
        last_computed: now,
    }
}

/// Number of trainings divided by the number of whole weeks between the first
/// and the last training, counting at least one week.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn avg_trainings_per_week(trainings: &[Training]) -> f64 {
    let first = trainings.iter().map(|t| t.date).min();
    let last = trainings.iter().map(|t| t.date).max();

    match (first, last) {
        (Some(first), Some(last)) => {
            let weeks = (last - first).num_weeks().max(1);
            trainings.len() as f64 / weeks as f64
        }
        _ => 0.0,
    }
}

/// Share of each training type in percent.
///
/// Types without trainings are omitted. Trainings of an unknown type count
/// towards the total but are not listed.
#[must_use]
pub fn type_percentages(trainings: &[Training]) -> BTreeMap<TrainingType, f64> {
    percentages(trainings.iter().map(|t| t.training_type), |t| {
        *t != TrainingType::Unknown
    })
}

/// Share of each exercise category in percent over all exercises of all
/// trainings.
#[must_use]
pub fn split_percentages(trainings: &[Training]) -> BTreeMap<Category, f64> {
    percentages(
        trainings
            .iter()
            .flat_map(|t| t.exercises.iter().map(|e| e.category)),
        |c| *c != Category::Unknown,
    )
}

#[allow(clippy::cast_precision_loss)]
fn percentages<K: Ord>(
    values: impl Iterator<Item = K>,
    is_listed: impl Fn(&K) -> bool,
) -> BTreeMap<K, f64> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    let mut total = 0usize;

    for value in values {
        total += 1;
        *counts.entry(value).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(key, _)| is_listed(key))
        .map(|(key, count)| (key, count as f64 / total as f64 * 100.0))
        .collect()
}
