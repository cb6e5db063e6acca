use std::{fmt, slice::Iter};

use crate::{Category, ReadError, UpdateError, WeekCalendar};

pub trait SettingsService {
    /// The stored settings, or the defaults if they cannot be read.
    fn get_settings(&self) -> Settings;
    fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, ReadError>;
    fn write_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: Theme,
    /// Only recorded, synchronization is not handled here.
    pub is_cloud_enabled: bool,
    pub time_exercises: bool,
    pub time_trainings: bool,
    pub week_calendar: WeekCalendar,
    /// Categories shown in the exercise library, in display order.
    pub categories: Vec<Category>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            is_cloud_enabled: false,
            time_exercises: true,
            time_trainings: true,
            week_calendar: WeekCalendar::ISO,
            categories: Category::CANONICAL.to_vec(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn iter() -> Iter<'static, Theme> {
        static THEMES: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];
        THEMES.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl TryFrom<&str> for Theme {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Theme::iter()
            .find(|t| t.name() == value)
            .copied()
            .ok_or(format!("unknown theme: {value}"))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
