use fivehundred_core::bid::{Bid, Rules};
use fivehundred_core::game::auction::BidRecord;
use fivehundred_core::game::outcome::HandResult;
use fivehundred_core::game::round::Contract;
use fivehundred_core::model::card::Card;
use fivehundred_core::model::hand::Hand;
use fivehundred_core::model::player::Seat;
use fivehundred_core::model::suit::Suit;
use fivehundred_core::model::trick::Trick;
use std::io;
use thiserror::Error;

/// What a seat can see when asked to bid.
#[derive(Debug, Clone, Copy)]
pub struct BidView<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub current: Option<BidRecord>,
    pub history: &'a [BidRecord],
}

/// What the contractor can see when asked to drop three cards.
#[derive(Debug, Clone, Copy)]
pub struct DropView<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub rules: Rules,
}

/// What a seat can see when asked to play. `valid` holds ascending indices into `hand`.
#[derive(Debug, Clone, Copy)]
pub struct PlayView<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub trick: &'a Trick,
    pub valid: &'a [usize],
    pub rules: Rules,
    pub contract: Contract,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("player i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("player sent a malformed message: {0}")]
    Protocol(String),
    #[error("player did not answer in time")]
    Timeout,
    #[error("player connection closed")]
    Closed,
}

/// A participant at the table.
///
/// The orchestrator informs players of what happened through the `notify_*` events,
/// which are best effort and never fail, and asks for decisions through the request
/// methods. A request may return an invalid answer (an illegal index, a bid that does
/// not outbid); the orchestrator asks again until the answer is valid. An `Err` is
/// reserved for a player that can no longer answer at all.
pub trait Player: Send {
    fn notify_seat(&mut self, _seat: Seat) {}
    fn notify_hand(&mut self, _hand: &Hand) {}
    fn notify_bid(&mut self, _seat: Seat, _bid: Bid) {}
    fn notify_bid_winner(&mut self, _contractor: Seat, _bid: Bid) {}
    fn notify_play(&mut self, _seat: Seat, _card: Card) {}
    fn notify_trick_winner(&mut self, _winner: Seat) {}
    fn notify_hand_result(&mut self, _result: &HandResult) {}

    fn bid(&mut self, view: &BidView) -> Result<Bid, PlayerError>;

    /// Three distinct indices into the contractor's hand.
    fn drop3(&mut self, view: &DropView) -> Result<Vec<usize>, PlayerError>;

    /// One index from `view.valid`.
    fn play(&mut self, view: &PlayView) -> Result<usize, PlayerError>;

    /// Suit for a Joker led under no-trumps or misère.
    fn joker_suit(&mut self, hand: &Hand) -> Result<Suit, PlayerError>;
}
