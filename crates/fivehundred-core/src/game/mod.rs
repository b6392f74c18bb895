pub mod auction;
pub mod outcome;
pub mod round;
pub mod serialization;
