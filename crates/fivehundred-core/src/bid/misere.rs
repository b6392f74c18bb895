use super::no_trumps::NoTrumpsBid;
use super::JokerSuit;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Contract to lose every trick. Card handling is plain no-trumps; only the value and
/// the success test differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MisereBid {
    pub open: bool,
    #[serde(skip)]
    rules: NoTrumpsBid,
}

impl MisereBid {
    pub const fn new(open: bool) -> Self {
        // Declared tricks play no part in misère.
        Self {
            open,
            rules: NoTrumpsBid::new(0),
        }
    }

    pub const fn closed() -> Self {
        Self::new(false)
    }

    pub const fn open() -> Self {
        Self::new(true)
    }

    pub fn no_trumps(self) -> NoTrumpsBid {
        self.rules
    }

    pub fn value(self) -> i32 {
        if self.open { 500 } else { 250 }
    }

    pub fn won(self, tricks_won: usize) -> bool {
        tricks_won == 0
    }

    pub fn effective_suit(self, card: Card, joker: JokerSuit) -> Option<Suit> {
        self.rules.effective_suit(card, joker)
    }

    pub fn card_order(self, lead: Card, joker: JokerSuit) -> Vec<Card> {
        self.rules.card_order(lead, joker)
    }

    pub fn valid_plays(self, trick: &Trick, hand: &Hand, joker: JokerSuit) -> Vec<usize> {
        self.rules.valid_plays(trick, hand, joker)
    }

    pub fn sort_hand(self, hand: &mut Hand) {
        self.rules.sort_hand(hand);
    }
}

impl fmt::Display for MisereBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.open {
            f.write_str("Open Misère")
        } else {
            f.write_str("Misère")
        }
    }
}
