use super::think;
use crate::bot::{BidPlanner, DropPlanner, PlayPlanner, longest_suit};
use crate::player::{BidView, DropView, PlayView, Player, PlayerError};
use fivehundred_core::bid::Bid;
use fivehundred_core::model::card::Card;
use fivehundred_core::model::hand::Hand;
use fivehundred_core::model::suit::Suit;
use std::time::Duration;
use tracing::{Level, event};

/// Rule-of-thumb player: counts tricks to bid, sheds weak cards into the kitty and
/// plays the cheapest winning card.
pub struct HeuristicPlayer {
    delay: Duration,
}

impl HeuristicPlayer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for HeuristicPlayer {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Player for HeuristicPlayer {
    fn bid(&mut self, view: &BidView) -> Result<Bid, PlayerError> {
        think(self.delay);
        let bid = BidPlanner::choose(view);
        event!(
            target: "fivehundred_bot::bid",
            Level::DEBUG,
            seat = %view.seat,
            current = ?view.current.map(|record| record.bid.to_string()),
            bid = %bid,
        );
        Ok(bid)
    }

    fn drop3(&mut self, view: &DropView) -> Result<Vec<usize>, PlayerError> {
        let chosen = DropPlanner::choose(view);
        if tracing::enabled!(Level::DEBUG) {
            let cards = chosen
                .iter()
                .filter_map(|&index| view.hand.get(index))
                .map(|card| card.to_string())
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "fivehundred_bot::drop",
                Level::DEBUG,
                seat = %view.seat,
                contract = %view.rules.bid(),
                cards = %cards,
            );
        }
        Ok(chosen)
    }

    fn play(&mut self, view: &PlayView) -> Result<usize, PlayerError> {
        think(self.delay);
        let chosen = PlayPlanner::choose(view)
            .ok_or_else(|| PlayerError::Protocol("asked to play with no legal cards".into()))?;
        log_play_decision(view, chosen);
        Ok(chosen)
    }

    fn joker_suit(&mut self, hand: &Hand) -> Result<Suit, PlayerError> {
        think(self.delay);
        Ok(longest_suit(hand))
    }
}

fn log_play_decision(view: &PlayView, chosen: usize) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let legal_preview = if view.valid.len() <= 6 {
        view.valid
            .iter()
            .filter_map(|&index| view.hand.get(index))
            .map(|card: Card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", view.valid.len())
    };
    let choice = view
        .hand
        .get(chosen)
        .map(|card| card.to_string())
        .unwrap_or_default();

    event!(
        target: "fivehundred_bot::play",
        Level::DEBUG,
        seat = %view.seat,
        contract = %view.contract.bid,
        legal_count = view.valid.len(),
        legal_moves = %legal_preview,
        chosen = %choice,
        trick_cards = view.trick.plays().len(),
    );
}
