use crate::bid::Bid;
use crate::model::player::Seat;
use core::fmt;
use serde::{Deserialize, Serialize};

/// How a hand ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HandResult {
    /// Everybody passed; the cards are thrown in.
    Redeal,
    BidWon {
        bid: Bid,
        contractor: Seat,
        tricks: usize,
    },
    BidLost {
        bid: Bid,
        contractor: Seat,
        tricks: usize,
    },
}

impl HandResult {
    pub fn contractors_won(&self) -> bool {
        matches!(self, HandResult::BidWon { .. })
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandResult::Redeal => f.write_str("Re-deal due to all players passing"),
            HandResult::BidWon { bid, tricks, .. } => write!(
                f,
                "Contractors won their bid of {bid} with {tricks} tricks"
            ),
            HandResult::BidLost { bid, tricks, .. } => write!(
                f,
                "Contractors lost their bid of {bid} with {tricks} tricks"
            ),
        }
    }
}
