use std::{fmt, slice::Iter};

use derive_more::{AsRef, Display};

use crate::{CreateError, DeleteError, ReadError, UpdateError, ValidationError, catalog};

pub trait ExerciseService {
    fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    fn create_exercise(
        &self,
        name: Name,
        category: Category,
        muscles: Vec<MuscleGroup>,
    ) -> Result<Exercise, CreateError>;
    fn replace_exercise(&self, name: &Name, exercise: Exercise) -> Result<Exercise, UpdateError>;
    fn delete_exercise(&self, name: &Name) -> Result<Name, DeleteError>;

    fn validate_exercise_name(&self, name: &str) -> Result<Name, ValidationError> {
        let name = Name::new(name).map_err(|err| ValidationError::Other(err.into()))?;
        match self.get_exercises() {
            Ok(exercises) => {
                if exercises.iter().any(|e| e.name.matches(&name)) {
                    Err(ValidationError::Conflict("name".to_string()))
                } else {
                    Ok(name)
                }
            }
            Err(err) => Err(ValidationError::Other(err.into())),
        }
    }

    #[must_use]
    fn group_by_category<'a>(
        &self,
        exercises: &'a [Exercise],
        categories: &[Category],
    ) -> Vec<(Category, Vec<&'a Exercise>)> {
        group_by_category(exercises, categories)
    }
}

/// Storage of user-defined exercises.
///
/// Exercises are identified by name. Default exercises from the catalog are
/// never stored, so replacing or deleting one of them yields `NotFound`.
pub trait ExerciseRepository {
    fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    fn create_exercise(&self, exercise: Exercise) -> Result<Exercise, CreateError>;
    fn replace_exercise(&self, name: &Name, exercise: Exercise) -> Result<Exercise, UpdateError>;
    fn delete_exercise(&self, name: &Name) -> Result<Name, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: Name,
    pub category: Category,
    pub muscles: Vec<MuscleGroup>,
    pub is_default: bool,
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.chars().count();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }

    /// Names are unique in the exercise library regardless of their case.
    #[must_use]
    pub fn matches(&self, other: &Name) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}

/// Body region targeted by an exercise (the training split).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Push,
    Pull,
    Legs,
    Cardio,
    None,
    Unknown,
}

impl Category {
    pub const CANONICAL: [Category; 4] = [
        Category::Push,
        Category::Pull,
        Category::Legs,
        Category::Cardio,
    ];

    pub fn iter() -> Iter<'static, Category> {
        static CATEGORIES: [Category; 5] = [
            Category::Push,
            Category::Pull,
            Category::Legs,
            Category::Cardio,
            Category::None,
        ];
        CATEGORIES.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Category::Push => "push",
            Category::Pull => "pull",
            Category::Legs => "legs",
            Category::Cardio => "cardio",
            Category::None => "none",
            Category::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn is_cardio(self) -> bool {
        self == Category::Cardio
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "push" => Category::Push,
            "pull" => Category::Pull,
            "legs" => Category::Legs,
            "cardio" => Category::Cardio,
            "" | "none" => Category::None,
            _ => Category::Unknown,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MuscleGroup {
    UpperTraps,
    MidLowerTraps,
    Neck,
    FrontDelts,
    SideDelts,
    RearDelts,
    UpperChest,
    MidLowerChest,
    Lats,
    UpperBack,
    Biceps,
    Triceps,
    Forearms,
    Abs,
    Obliques,
    LowerBack,
    Glutes,
    HipFlexors,
    Adductors,
    Abductors,
    Quads,
    Hamstrings,
    Calves,
    Tibialis,
}

impl MuscleGroup {
    pub fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 24] = [
            MuscleGroup::UpperTraps,
            MuscleGroup::MidLowerTraps,
            MuscleGroup::Neck,
            MuscleGroup::FrontDelts,
            MuscleGroup::SideDelts,
            MuscleGroup::RearDelts,
            MuscleGroup::UpperChest,
            MuscleGroup::MidLowerChest,
            MuscleGroup::Lats,
            MuscleGroup::UpperBack,
            MuscleGroup::Biceps,
            MuscleGroup::Triceps,
            MuscleGroup::Forearms,
            MuscleGroup::Abs,
            MuscleGroup::Obliques,
            MuscleGroup::LowerBack,
            MuscleGroup::Glutes,
            MuscleGroup::HipFlexors,
            MuscleGroup::Adductors,
            MuscleGroup::Abductors,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Calves,
            MuscleGroup::Tibialis,
        ];
        MUSCLE_GROUPS.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MuscleGroup::UpperTraps => "Upper Traps",
            MuscleGroup::MidLowerTraps => "Mid/Lower Traps",
            MuscleGroup::Neck => "Neck",
            MuscleGroup::FrontDelts => "Front Delts",
            MuscleGroup::SideDelts => "Side Delts",
            MuscleGroup::RearDelts => "Rear Delts",
            MuscleGroup::UpperChest => "Upper Chest",
            MuscleGroup::MidLowerChest => "Mid/Lower Chest",
            MuscleGroup::Lats => "Lats",
            MuscleGroup::UpperBack => "Upper Back",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Abs => "Abs",
            MuscleGroup::Obliques => "Obliques",
            MuscleGroup::LowerBack => "Lower Back",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::HipFlexors => "Hip Flexors",
            MuscleGroup::Adductors => "Adductors",
            MuscleGroup::Abductors => "Abductors",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::Tibialis => "Tibialis",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<MuscleGroup> {
        MuscleGroup::iter().find(|m| m.name() == name).copied()
    }
}

/// Partition exercises by category.
///
/// The result contains one entry per element of `categories`, in the given
/// order, even if no exercise matches. Exercises keep their input order
/// within a category. Exercises of a category not listed are left out.
#[must_use]
pub fn group_by_category<'a>(
    exercises: &'a [Exercise],
    categories: &[Category],
) -> Vec<(Category, Vec<&'a Exercise>)> {
    categories
        .iter()
        .map(|category| {
            (
                *category,
                exercises
                    .iter()
                    .filter(|e| e.category == *category)
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// The default exercises followed by the user-defined exercises.
#[must_use]
pub fn exercise_library(user_exercises: &[Exercise]) -> Vec<Exercise> {
    catalog::exercises()
        .into_iter()
        .chain(user_exercises.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn exercise(name: &str, category: Category) -> Exercise {
        Exercise {
            name: Name::new(name).unwrap(),
            category,
            muscles: vec![],
            is_default: false,
        }
    }

    #[rstest]
    #[case("Bench Press", Ok(Name("Bench Press".to_string())))]
    #[case("  Deadlift  ", Ok(Name("Deadlift".to_string())))]
    #[case("", Err(NameError::Empty))]
    #[case("   ", Err(NameError::Empty))]
    #[case(
        "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        Err(NameError::TooLong(65))
    )]
    #[case(
        "ÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄ",
        Ok(Name("ÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄ".to_string()))
    )]
    fn test_name_new(#[case] name: &str, #[case] expected: Result<Name, NameError>) {
        assert_eq!(Name::new(name), expected);
    }

    #[rstest]
    #[case("Squat", "squat", true)]
    #[case("Squat", "Front Squat", false)]
    fn test_name_matches(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(
            Name::new(a).unwrap().matches(&Name::new(b).unwrap()),
            expected
        );
    }

    #[rstest]
    #[case("push", Category::Push)]
    #[case("Pull", Category::Pull)]
    #[case(" legs ", Category::Legs)]
    #[case("cardio", Category::Cardio)]
    #[case("", Category::None)]
    #[case("none", Category::None)]
    #[case("core", Category::Unknown)]
    fn test_category_from_str(#[case] input: &str, #[case] expected: Category) {
        assert_eq!(Category::from(input), expected);
    }

    #[test]
    fn test_category_name_round_trip() {
        for category in Category::iter() {
            assert_eq!(Category::from(category.name()), *category);
        }
    }

    #[test]
    fn test_muscle_group_iter() {
        assert_eq!(MuscleGroup::iter().count(), 24);
    }

    #[rstest]
    #[case("Mid/Lower Chest", Some(MuscleGroup::MidLowerChest))]
    #[case("Tibialis", Some(MuscleGroup::Tibialis))]
    #[case("Pecs", None)]
    fn test_muscle_group_from_name(#[case] name: &str, #[case] expected: Option<MuscleGroup>) {
        assert_eq!(MuscleGroup::from_name(name), expected);
    }

    #[test]
    fn test_group_by_category() {
        let exercises = vec![
            exercise("Pull-up", Category::Pull),
            exercise("Bench Press", Category::Push),
        ];

        assert_eq!(
            group_by_category(&exercises, &Category::CANONICAL),
            vec![
                (Category::Push, vec![&exercises[1]]),
                (Category::Pull, vec![&exercises[0]]),
                (Category::Legs, vec![]),
                (Category::Cardio, vec![]),
            ]
        );
    }

    #[test]
    fn test_group_by_category_keeps_input_order() {
        let exercises = vec![
            exercise("Squat", Category::Legs),
            exercise("Row", Category::Pull),
            exercise("Lunge", Category::Legs),
            exercise("Leg Press", Category::Legs),
        ];

        assert_eq!(
            group_by_category(&exercises, &[Category::Legs, Category::Pull]),
            vec![
                (
                    Category::Legs,
                    vec![&exercises[0], &exercises[2], &exercises[3]]
                ),
                (Category::Pull, vec![&exercises[1]]),
            ]
        );
    }

    #[rstest]
    #[case::no_exercises(&[], &Category::CANONICAL, 4)]
    #[case::no_categories(&[Category::Push], &[], 0)]
    fn test_group_by_category_entry_count(
        #[case] categories_of_exercises: &[Category],
        #[case] categories: &[Category],
        #[case] expected: usize,
    ) {
        let exercises = categories_of_exercises
            .iter()
            .enumerate()
            .map(|(i, c)| exercise(&format!("E{i}"), *c))
            .collect::<Vec<_>>();
        let groups = group_by_category(&exercises, categories);
        assert_eq!(groups.len(), expected);
        assert_eq!(
            groups.iter().map(|(c, _)| *c).collect::<Vec<_>>(),
            categories.to_vec()
        );
    }

    #[test]
    fn test_group_by_category_omits_unlisted_categories() {
        let exercises = vec![
            exercise("Plank", Category::None),
            exercise("Mystery", Category::Unknown),
        ];

        assert!(
            group_by_category(&exercises, &Category::CANONICAL)
                .iter()
                .all(|(_, e)| e.is_empty())
        );
    }

    #[test]
    fn test_exercise_library() {
        let user_exercises = vec![exercise("Farmer's Walk", Category::None)];
        let library = exercise_library(&user_exercises);

        assert_eq!(library.len(), catalog::EXERCISES.len() + 1);
        assert!(library[..catalog::EXERCISES.len()].iter().all(|e| e.is_default));
        assert_eq!(library.last(), Some(&user_exercises[0]));
    }
}
