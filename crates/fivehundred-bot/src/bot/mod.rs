mod bid;
mod drop;
mod play;

pub use bid::BidPlanner;
pub use drop::DropPlanner;
pub use play::PlayPlanner;

use fivehundred_core::bid::{Bid, Rules};
use fivehundred_core::model::card::Card;
use fivehundred_core::model::hand::Hand;
use fivehundred_core::model::suit::Suit;

/// Tricks the planners assume the partner contributes.
pub(crate) const PARTNER_TRICKS: usize = 2;

/// Trump suit of a suit contract.
pub(crate) fn trump_of(rules: &Rules) -> Option<Suit> {
    match rules.bid() {
        Bid::Suit(bid) => Some(bid.trump),
        _ => None,
    }
}

/// Relative power of `card` under `rules`; larger wins more often. Trumps outrank every
/// plain card and the Joker outranks everything.
pub(crate) fn card_strength(rules: &Rules, card: Card) -> usize {
    if card.is_joker() {
        return usize::MAX;
    }
    let order = rules.card_order(card);
    let position = order
        .iter()
        .position(|&ranked| ranked == card)
        .unwrap_or(order.len());
    let base = order.len() - position;
    match trump_of(rules) {
        Some(trump) if rules.effective_suit(card) == Some(trump) => base + 100,
        _ => base,
    }
}

/// Suit with the most cards in `hand`, ignoring the Joker. Ties go to the earlier suit.
pub(crate) fn longest_suit(hand: &Hand) -> Suit {
    let mut best = Suit::Spades;
    let mut best_count = 0;
    for suit in Suit::ALL {
        let count = hand.iter().filter(|card| card.suit == Some(suit)).count();
        if count > best_count {
            best = suit;
            best_count = count;
        }
    }
    best
}
