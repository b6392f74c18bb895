use super::{follow_suit, plain_run};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// A contract naming a trump suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuitBid {
    pub tricks: u8,
    pub trump: Suit,
}

impl SuitBid {
    pub const fn new(tricks: u8, trump: Suit) -> Self {
        Self { tricks, trump }
    }

    pub fn value(self) -> i32 {
        let base = match self.trump {
            Suit::Spades => 40,
            Suit::Clubs => 60,
            Suit::Diamonds => 80,
            Suit::Hearts => 100,
        };
        base + 100 * (i32::from(self.tricks) - 6)
    }

    pub fn won(self, tricks_won: usize) -> bool {
        tricks_won >= usize::from(self.tricks)
    }

    pub fn right_bower(self) -> Card {
        Card::new(Rank::Jack, self.trump)
    }

    pub fn left_bower(self) -> Card {
        Card::new(Rank::Jack, self.trump.same_colour())
    }

    /// Joker and left bower belong to trumps; everything else keeps its printed suit.
    pub fn effective_suit(self, card: Card) -> Option<Suit> {
        if card.is_joker() || card == self.left_bower() {
            Some(self.trump)
        } else {
            card.suit
        }
    }

    /// Trick ranking for the given lead, highest first:
    ///
    /// ```text
    /// JOK  J♥  J♦  A♥  K♥  Q♥  10♥ ... 5♥  4♥      (trumps = ♥)
    /// A♠   K♠  Q♠  J♠  10♠ ... 5♠                  (lead = ♠ only)
    /// ```
    pub fn card_order(self, lead: Card) -> Vec<Card> {
        let mut order = Vec::with_capacity(24);
        order.push(Card::JOKER);
        order.push(self.right_bower());
        order.push(self.left_bower());
        order.extend(plain_run(self.trump, false));

        if let Some(lead_suit) = self.effective_suit(lead) {
            if lead_suit != self.trump {
                order.extend(plain_run(lead_suit, true));
            }
        }
        order
    }

    pub fn valid_plays(self, trick: &Trick, hand: &Hand) -> Vec<usize> {
        follow_suit(trick, hand, |card| self.effective_suit(card), |_| false)
    }

    /// Off-suits first in a fixed colour-alternating order, trumps last; lowest trick
    /// rank first within each group.
    pub fn sort_hand(self, hand: &mut Hand) {
        hand.sort_by_key(|&card| {
            let position = self
                .card_order(card)
                .iter()
                .position(|&c| c == card)
                .unwrap_or(usize::MAX);
            (self.group_rank(card), Reverse(position))
        });
    }

    fn group_rank(self, card: Card) -> u8 {
        let Some(suit) = self.effective_suit(card) else {
            return 0;
        };
        if suit == self.trump {
            return 4;
        }
        let order: [Suit; 3] = match self.trump {
            Suit::Spades => [Suit::Diamonds, Suit::Clubs, Suit::Hearts],
            Suit::Clubs => [Suit::Diamonds, Suit::Spades, Suit::Hearts],
            Suit::Diamonds => [Suit::Spades, Suit::Hearts, Suit::Clubs],
            Suit::Hearts => [Suit::Spades, Suit::Diamonds, Suit::Clubs],
        };
        order
            .iter()
            .position(|&s| s == suit)
            .map_or(0, |index| index as u8 + 1)
    }
}

impl fmt::Display for SuitBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tricks, self.trump)
    }
}

#[cfg(test)]
mod tests {
    use super::SuitBid;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn hearts_trump_order_from_joker_lead() {
        let bid = SuitBid::new(6, Suit::Hearts);
        let order = bid.card_order(Card::JOKER);
        let h = Suit::Hearts;
        let expected = vec![
            Card::JOKER,
            c(Rank::Jack, h),
            c(Rank::Jack, Suit::Diamonds),
            c(Rank::Ace, h),
            c(Rank::King, h),
            c(Rank::Queen, h),
            c(Rank::Ten, h),
            c(Rank::Nine, h),
            c(Rank::Eight, h),
            c(Rank::Seven, h),
            c(Rank::Six, h),
            c(Rank::Five, h),
            c(Rank::Four, h),
        ];
        assert_eq!(order, expected);
    }

    #[test]
    fn off_suit_lead_appends_lead_suit_without_black_four() {
        let bid = SuitBid::new(7, Suit::Spades);
        let order = bid.card_order(c(Rank::Nine, Suit::Clubs));
        assert_eq!(order.len(), 12 + 10);
        let cl = Suit::Clubs;
        assert_eq!(
            &order[12..],
            &[
                c(Rank::Ace, cl),
                c(Rank::King, cl),
                c(Rank::Queen, cl),
                c(Rank::Jack, cl),
                c(Rank::Ten, cl),
                c(Rank::Nine, cl),
                c(Rank::Eight, cl),
                c(Rank::Seven, cl),
                c(Rank::Six, cl),
                c(Rank::Five, cl),
            ]
        );
    }

    #[test]
    fn left_bower_lead_counts_as_trump_lead() {
        let bid = SuitBid::new(6, Suit::Diamonds);
        let order = bid.card_order(c(Rank::Jack, Suit::Hearts));
        assert_eq!(order.len(), 13);
    }

    #[test]
    fn left_bower_changes_suit() {
        let bid = SuitBid::new(6, Suit::Hearts);
        assert_eq!(bid.effective_suit(c(Rank::Jack, Suit::Diamonds)), Some(Suit::Hearts));
        assert_eq!(bid.effective_suit(c(Rank::Nine, Suit::Spades)), Some(Suit::Spades));
        assert_eq!(bid.effective_suit(c(Rank::Queen, Suit::Diamonds)), Some(Suit::Diamonds));
        assert_eq!(bid.effective_suit(Card::JOKER), Some(Suit::Hearts));
    }

    #[test]
    fn values_follow_bidding_table() {
        assert_eq!(SuitBid::new(6, Suit::Spades).value(), 40);
        assert_eq!(SuitBid::new(6, Suit::Hearts).value(), 100);
        assert_eq!(SuitBid::new(8, Suit::Clubs).value(), 260);
        assert_eq!(SuitBid::new(10, Suit::Hearts).value(), 500);
    }

    #[test]
    fn sort_puts_trumps_last_with_bowers_on_top() {
        let bid = SuitBid::new(6, Suit::Hearts);
        let mut hand = Hand::with_cards(vec![
            Card::JOKER,
            c(Rank::Jack, Suit::Diamonds),
            c(Rank::Ace, Suit::Hearts),
            c(Rank::Five, Suit::Clubs),
            c(Rank::King, Suit::Spades),
            c(Rank::Four, Suit::Diamonds),
            c(Rank::Jack, Suit::Hearts),
        ]);
        bid.sort_hand(&mut hand);
        assert_eq!(
            hand.cards(),
            &[
                c(Rank::King, Suit::Spades),
                c(Rank::Four, Suit::Diamonds),
                c(Rank::Five, Suit::Clubs),
                c(Rank::Ace, Suit::Hearts),
                c(Rank::Jack, Suit::Diamonds),
                c(Rank::Jack, Suit::Hearts),
                Card::JOKER,
            ]
        );
    }
}
