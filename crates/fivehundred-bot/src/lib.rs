pub mod bot;
pub mod player;
pub mod policy;

pub use bot::{BidPlanner, DropPlanner, PlayPlanner};
pub use player::{BidView, DropView, PlayView, Player, PlayerError};
pub use policy::{HeuristicPlayer, RandomPlayer};
