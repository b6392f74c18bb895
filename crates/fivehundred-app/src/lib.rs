pub mod config;
pub mod controller;
pub mod human;
pub mod logging;
pub mod remote;

pub use controller::{ControllerError, ControllerSettings, GameController};
