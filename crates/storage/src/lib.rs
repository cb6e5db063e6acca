#![warn(clippy::pedantic)]

pub mod json_file;
pub mod log;
mod state;


pub use json_file::{File, JsonFile};
pub use state::*;
