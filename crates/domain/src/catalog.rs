use crate::{Category, MuscleGroup, Name};

/// Built-in exercise shipped with the application.
#[derive(Clone)]
pub struct Exercise {
    pub name: &'static str,
    pub category: Category,
    pub muscles: &'static [MuscleGroup],
}

impl TryFrom<&Exercise> for crate::Exercise {
    type Error = crate::NameError;

    fn try_from(value: &Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            name: Name::new(value.name)?,
            category: value.category,
            muscles: value.muscles.to_vec(),
            is_default: true,
        })
    }
}

#[must_use]
pub fn exercises() -> Vec<crate::Exercise> {
    EXERCISES
        .iter()
        .filter_map(|e| crate::Exercise::try_from(e).ok())
        .collect()
}

pub const EXERCISES: &[Exercise] = &[
    Exercise {
        name: "Bench Press",
        category: Category::Push,
        muscles: &[
            MuscleGroup::MidLowerChest,
            MuscleGroup::FrontDelts,
            MuscleGroup::Triceps,
        ],
    },
    Exercise {
        name: "Incline Dumbbell Press",
        category: Category::Push,
        muscles: &[
            MuscleGroup::UpperChest,
            MuscleGroup::FrontDelts,
            MuscleGroup::Triceps,
        ],
    },
    Exercise {
        name: "Overhead Press",
        category: Category::Push,
        muscles: &[
            MuscleGroup::FrontDelts,
            MuscleGroup::SideDelts,
            MuscleGroup::Triceps,
        ],
    },
    Exercise {
        name: "Lateral Raise",
        category: Category::Push,
        muscles: &[MuscleGroup::SideDelts],
    },
    Exercise {
        name: "Dips",
        category: Category::Push,
        muscles: &[MuscleGroup::MidLowerChest, MuscleGroup::Triceps],
    },
    Exercise {
        name: "Triceps Pushdown",
        category: Category::Push,
        muscles: &[MuscleGroup::Triceps],
    },
    Exercise {
        name: "Pull-up",
        category: Category::Pull,
        muscles: &[MuscleGroup::Lats, MuscleGroup::Biceps],
    },
    Exercise {
        name: "Lat Pulldown",
        category: Category::Pull,
        muscles: &[MuscleGroup::Lats, MuscleGroup::Biceps],
    },
    Exercise {
        name: "Barbell Row",
        category: Category::Pull,
        muscles: &[
            MuscleGroup::UpperBack,
            MuscleGroup::Lats,
            MuscleGroup::RearDelts,
        ],
    },
    Exercise {
        name: "Face Pull",
        category: Category::Pull,
        muscles: &[MuscleGroup::RearDelts, MuscleGroup::MidLowerTraps],
    },
    Exercise {
        name: "Biceps Curl",
        category: Category::Pull,
        muscles: &[MuscleGroup::Biceps, MuscleGroup::Forearms],
    },
    Exercise {
        name: "Squat",
        category: Category::Legs,
        muscles: &[
            MuscleGroup::Quads,
            MuscleGroup::Glutes,
            MuscleGroup::Adductors,
        ],
    },
    Exercise {
        name: "Deadlift",
        category: Category::Legs,
        muscles: &[
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::LowerBack,
        ],
    },
    Exercise {
        name: "Leg Press",
        category: Category::Legs,
        muscles: &[MuscleGroup::Quads, MuscleGroup::Glutes],
    },
    Exercise {
        name: "Romanian Deadlift",
        category: Category::Legs,
        muscles: &[MuscleGroup::Hamstrings, MuscleGroup::Glutes],
    },
    Exercise {
        name: "Calf Raise",
        category: Category::Legs,
        muscles: &[MuscleGroup::Calves],
    },
    Exercise {
        name: "Treadmill",
        category: Category::Cardio,
        muscles: &[],
    },
    Exercise {
        name: "Rowing Machine",
        category: Category::Cardio,
        muscles: &[],
    },
    Exercise {
        name: "Cycling",
        category: Category::Cardio,
        muscles: &[],
    },
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_exercises_are_valid() {
        assert_eq!(exercises().len(), EXERCISES.len());
    }

    #[test]
    fn test_exercise_names_are_unique() {
        let names = EXERCISES
            .iter()
            .map(|e| e.name.to_lowercase())
            .collect::<BTreeSet<_>>();
        assert_eq!(names.len(), EXERCISES.len());
    }

    #[test]
    fn test_every_canonical_category_has_exercises() {
        for category in Category::CANONICAL {
            assert!(EXERCISES.iter().any(|e| e.category == category));
        }
    }

    #[test]
    fn test_only_cardio_exercises_have_no_muscles() {
        for exercise in EXERCISES {
            assert_eq!(exercise.muscles.is_empty(), exercise.category.is_cardio());
        }
    }
}
