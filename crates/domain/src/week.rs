use std::{collections::BTreeMap, fmt};

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};

use crate::Training;

/// Rules for splitting the calendar into weeks.
///
/// Week numbering follows the usual convention: the first week of a year is
/// the first week containing at least `min_days_in_first_week` days of that
/// year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCalendar {
    pub first_weekday: Weekday,
    pub min_days_in_first_week: u8,
}

impl WeekCalendar {
    /// Weeks start on Monday, week 1 contains the first Thursday (ISO 8601).
    pub const ISO: WeekCalendar = WeekCalendar {
        first_weekday: Weekday::Mon,
        min_days_in_first_week: 4,
    };
    /// Weeks start on Sunday, week 1 contains January 1.
    pub const US: WeekCalendar = WeekCalendar {
        first_weekday: Weekday::Sun,
        min_days_in_first_week: 1,
    };

    /// The week containing `date`.
    ///
    /// Returns `None` if the week extends beyond the range of representable
    /// dates.
    #[must_use]
    pub fn week_of(&self, date: NaiveDate) -> Option<Week> {
        let start = date.checked_sub_days(Days::new(self.offset(date.weekday())))?;
        let end = start.checked_add_days(Days::new(6))?;
        let mut year = end.year();
        let mut first = self.first_week_start(year)?;
        if start < first {
            year -= 1;
            first = self.first_week_start(year)?;
        }
        let number = u32::try_from((start - first).num_weeks() + 1).ok()?;
        Some(Week {
            year,
            number,
            start,
        })
    }

    /// Days between the start of the week and `weekday`.
    fn offset(&self, weekday: Weekday) -> u64 {
        u64::from(
            (7 + weekday.num_days_from_monday() - self.first_weekday.num_days_from_monday()) % 7,
        )
    }

    fn first_week_start(&self, year: i32) -> Option<NaiveDate> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let offset = self.offset(jan1.weekday());
        let start = jan1.checked_sub_days(Days::new(offset))?;
        if 7 - offset >= u64::from(self.min_days_in_first_week) {
            Some(start)
        } else {
            start.checked_add_days(Days::new(7))
        }
    }
}

impl Default for WeekCalendar {
    fn default() -> Self {
        WeekCalendar::ISO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Week {
    pub year: i32,
    pub number: u32,
    pub start: NaiveDate,
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} / {}", self.number, self.year)
    }
}

/// Trainings falling into the same calendar week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGroup<'a> {
    pub week: Week,
    /// Start of the first day of the week.
    pub start: NaiveDateTime,
    pub label: String,
    /// Sorted by date, newest first.
    pub trainings: Vec<&'a Training>,
}

/// Partition trainings into calendar weeks.
///
/// Groups are ordered by week start, newest first. Each training appears in
/// exactly one group. Trainings with equal dates keep their input order.
#[must_use]
pub fn group_by_week(trainings: &[Training], calendar: WeekCalendar) -> Vec<WeekGroup<'_>> {
    let mut weeks: BTreeMap<NaiveDate, (Week, Vec<&Training>)> = BTreeMap::new();

    for training in trainings {
        let date = training.date.date();
        let week = calendar.week_of(date).unwrap_or(Week {
            year: date.year(),
            number: 0,
            start: date,
        });
        weeks
            .entry(week.start)
            .or_insert_with(|| (week, vec![]))
            .1
            .push(training);
    }

    weeks
        .into_values()
        .rev()
        .map(|(week, mut trainings)| {
            trainings.sort_by(|a, b| b.date.cmp(&a.date));
            WeekGroup {
                week,
                start: week.start.and_time(chrono::NaiveTime::MIN),
                label: week.to_string(),
                trainings,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{Time, TrainingID, TrainingType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn training(id: u128, date: NaiveDateTime) -> Training {
        Training {
            id: TrainingID::from(id),
            date,
            duration: Time::default(),
            training_type: TrainingType::Strength,
            exercises: vec![],
        }
    }

    #[test]
    fn test_week_of_iso_matches_chrono() {
        let mut day = date(1999, 12, 1);
        while day < date(2031, 2, 1) {
            let week = WeekCalendar::ISO.week_of(day).unwrap();
            let iso = day.iso_week();
            assert_eq!((week.year, week.number), (iso.year(), iso.week()), "{day}");
            assert_eq!(week.start.weekday(), Weekday::Mon);
            day = day.succ_opt().unwrap();
        }
    }

    #[rstest]
    #[case(date(2024, 1, 1), 2024, 1, date(2023, 12, 31))]
    #[case(date(2023, 12, 30), 2023, 52, date(2023, 12, 24))]
    #[case(date(2022, 1, 1), 2022, 1, date(2021, 12, 26))]
    #[case(date(2022, 12, 31), 2022, 53, date(2022, 12, 25))]
    #[case(date(2026, 10, 19), 2026, 43, date(2026, 10, 18))]
    fn test_week_of_us(
        #[case] day: NaiveDate,
        #[case] year: i32,
        #[case] number: u32,
        #[case] start: NaiveDate,
    ) {
        assert_eq!(
            WeekCalendar::US.week_of(day),
            Some(Week {
                year,
                number,
                start
            })
        );
    }

    #[rstest]
    #[case(WeekCalendar::ISO)]
    #[case(WeekCalendar::US)]
    fn test_week_of_range_limits(#[case] calendar: WeekCalendar) {
        for day in [NaiveDate::MIN, NaiveDate::MAX] {
            if let Some(week) = calendar.week_of(day) {
                assert!(week.start <= day);
                assert!(week.number >= 1);
            }
        }
    }

    #[test]
    fn test_week_display() {
        assert_eq!(
            WeekCalendar::ISO.week_of(date(2024, 1, 3)).unwrap().to_string(),
            "week 1 / 2024"
        );
    }

    #[test]
    fn test_group_by_week() {
        let trainings = vec![
            training(1, date(2024, 1, 1).and_hms_opt(10, 0, 0).unwrap()),
            training(2, date(2024, 1, 3).and_hms_opt(10, 0, 0).unwrap()),
            training(3, date(2024, 1, 10).and_hms_opt(10, 0, 0).unwrap()),
        ];

        let groups = group_by_week(&trainings, WeekCalendar::ISO);

        assert_eq!(
            groups,
            vec![
                WeekGroup {
                    week: Week {
                        year: 2024,
                        number: 2,
                        start: date(2024, 1, 8)
                    },
                    start: date(2024, 1, 8).and_hms_opt(0, 0, 0).unwrap(),
                    label: "week 2 / 2024".to_string(),
                    trainings: vec![&trainings[2]],
                },
                WeekGroup {
                    week: Week {
                        year: 2024,
                        number: 1,
                        start: date(2024, 1, 1)
                    },
                    start: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
                    label: "week 1 / 2024".to_string(),
                    trainings: vec![&trainings[1], &trainings[0]],
                },
            ]
        );
    }

    #[test]
    fn test_group_by_week_empty() {
        assert_eq!(group_by_week(&[], WeekCalendar::ISO), vec![]);
    }

    #[test]
    fn test_group_by_week_single() {
        let trainings = vec![training(1, date(2024, 5, 5).and_hms_opt(7, 0, 0).unwrap())];

        let groups = group_by_week(&trainings, WeekCalendar::ISO);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].start, date(2024, 4, 29).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(groups[0].trainings, vec![&trainings[0]]);
    }

    #[test]
    fn test_group_by_week_depends_on_calendar() {
        let trainings = vec![
            training(1, date(2024, 1, 6).and_hms_opt(10, 0, 0).unwrap()),
            training(2, date(2024, 1, 7).and_hms_opt(10, 0, 0).unwrap()),
        ];

        assert_eq!(group_by_week(&trainings, WeekCalendar::ISO).len(), 1);
        assert_eq!(group_by_week(&trainings, WeekCalendar::US).len(), 2);
    }

    #[test]
    fn test_group_by_week_stable_for_equal_dates() {
        let at = date(2024, 3, 6).and_hms_opt(9, 30, 0).unwrap();
        let trainings = vec![training(1, at), training(2, at), training(3, at)];

        let groups = group_by_week(&trainings, WeekCalendar::ISO);

        assert_eq!(
            groups[0].trainings,
            vec![&trainings[0], &trainings[1], &trainings[2]]
        );
    }

    #[test]
    fn test_group_by_week_partitions_all_trainings() {
        let first = date(2023, 11, 20).and_hms_opt(6, 0, 0).unwrap();
        let trainings = (0..60u32)
            .map(|i| training(u128::from(i), first + Duration::hours(i64::from(i) * 31)))
            .collect::<Vec<_>>();

        let groups = group_by_week(&trainings, WeekCalendar::ISO);

        let mut grouped = groups
            .iter()
            .flat_map(|g| g.trainings.iter().map(|t| t.id))
            .collect::<Vec<_>>();
        grouped.sort();
        let mut expected = trainings.iter().map(|t| t.id).collect::<Vec<_>>();
        expected.sort();
        assert_eq!(grouped, expected);
        for pair in groups.windows(2) {
            assert!(pair[0].start > pair[1].start);
        }
        for group in &groups {
            assert!(group.trainings.windows(2).all(|p| p[0].date >= p[1].date));
            assert!(group.trainings.iter().all(|t| {
                t.date >= group.start && t.date < group.start + Duration::days(7)
            }));
        }
    }

    #[test]
    fn test_group_by_week_extreme_dates() {
        let trainings = vec![
            training(1, NaiveDateTime::MIN),
            training(2, NaiveDateTime::MAX),
        ];

        let groups = group_by_week(&trainings, WeekCalendar::ISO);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].trainings, vec![&trainings[1]]);
        assert_eq!(groups[1].trainings, vec![&trainings[0]]);
    }
}
