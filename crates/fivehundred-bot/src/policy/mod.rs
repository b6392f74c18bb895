mod heuristic;
mod random;

pub use heuristic::HeuristicPlayer;
pub use random::RandomPlayer;

use std::thread;
use std::time::Duration;

/// Pause so automated decisions are visible to a human at the table.
pub(crate) fn think(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
