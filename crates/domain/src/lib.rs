#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
mod error;
mod exercise;
mod service;
mod settings;
mod statistics;
mod store;
mod training;
mod week;

pub use error::*;
pub use exercise::*;
pub use service::*;
pub use settings::*;
pub use statistics::*;
pub use store::*;
pub use training::*;
pub use week::*;
