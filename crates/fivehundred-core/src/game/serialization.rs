use super::auction::BidRecord;
use super::outcome::HandResult;
use super::round::{Contract, RoundPhase, RoundState, TrickRecord};
use crate::bid::JokerSuit;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::trick::Trick;
use serde::{Deserialize, Serialize};

/// Read-only dump of a hand in progress, written after every step for inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub hands: [Hand; 4],
    pub kitty: Vec<Card>,
    pub discarded: Vec<Card>,
    pub bids: Vec<BidRecord>,
    pub contract: Option<Contract>,
    pub joker_suit: JokerSuit,
    pub tricks: Vec<TrickRecord>,
    pub current_trick: Trick,
    pub result: Option<HandResult>,
}

impl RoundSnapshot {
    pub fn capture(state: &RoundState) -> Self {
        RoundSnapshot {
            phase: state.phase(),
            hands: state.hands().clone(),
            kitty: state.kitty().to_vec(),
            discarded: state.discarded().to_vec(),
            bids: state.bid_history().to_vec(),
            contract: state.contract(),
            joker_suit: state.joker_suit(),
            tricks: state.trick_history().to_vec(),
            current_trick: state.current_trick().clone(),
            result: state.result(),
        }
    }

    pub fn to_json(state: &RoundState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
