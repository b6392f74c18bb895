use super::{JokerSuit, follow_suit, plain_run};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoTrumpsBid {
    pub tricks: u8,
}

impl NoTrumpsBid {
    pub const fn new(tricks: u8) -> Self {
        Self { tricks }
    }

    pub fn value(self) -> i32 {
        120 + 100 * (i32::from(self.tricks) - 6)
    }

    pub fn won(self, tricks_won: usize) -> bool {
        tricks_won >= usize::from(self.tricks)
    }

    /// Printed suit, except the Joker which takes whatever suit was called for it.
    pub fn effective_suit(self, card: Card, joker: JokerSuit) -> Option<Suit> {
        if card.is_joker() {
            joker.get()
        } else {
            card.suit
        }
    }

    /// The Joker always wins; after it only the lead suit can take the trick.
    pub fn card_order(self, lead: Card, joker: JokerSuit) -> Vec<Card> {
        let mut order = Vec::with_capacity(12);
        order.push(Card::JOKER);
        if let Some(lead_suit) = self.effective_suit(lead, joker) {
            order.extend(plain_run(lead_suit, true));
        }
        order
    }

    pub fn valid_plays(self, trick: &Trick, hand: &Hand, joker: JokerSuit) -> Vec<usize> {
        follow_suit(
            trick,
            hand,
            |card| self.effective_suit(card, joker),
            Card::is_joker,
        )
    }

    pub fn sort_hand(self, hand: &mut Hand) {
        hand.sort_by_key(|&card| {
            let group = match card.suit {
                Some(Suit::Spades) => 1,
                Some(Suit::Diamonds) => 2,
                Some(Suit::Clubs) => 3,
                Some(Suit::Hearts) => 4,
                None => 5,
            };
            (group, card.rank)
        });
    }
}

impl fmt::Display for NoTrumpsBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}NT", self.tricks)
    }
}

#[cfg(test)]
mod tests {
    use super::NoTrumpsBid;
    use crate::bid::JokerSuit;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::player::Seat;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;

    #[test]
    fn joker_suit_follows_binding() {
        let bid = NoTrumpsBid::new(7);
        assert_eq!(bid.effective_suit(Card::JOKER, JokerSuit::UNBOUND), None);
        assert_eq!(
            bid.effective_suit(Card::JOKER, JokerSuit::bound(Suit::Clubs)),
            Some(Suit::Clubs)
        );
        let jack = Card::new(Rank::Jack, Suit::Diamonds);
        assert_eq!(
            bid.effective_suit(jack, JokerSuit::bound(Suit::Hearts)),
            Some(Suit::Diamonds)
        );
    }

    #[test]
    fn order_is_joker_then_lead_suit() {
        let bid = NoTrumpsBid::new(6);
        let order = bid.card_order(Card::new(Rank::Six, Suit::Hearts), JokerSuit::UNBOUND);
        assert_eq!(order.len(), 12);
        assert_eq!(order[0], Card::JOKER);
        assert_eq!(order[1], Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(order[4], Card::new(Rank::Jack, Suit::Hearts));
        assert_eq!(order[11], Card::new(Rank::Four, Suit::Hearts));
    }

    #[test]
    fn bound_joker_lead_orders_called_suit() {
        let bid = NoTrumpsBid::new(6);
        let order = bid.card_order(Card::JOKER, JokerSuit::bound(Suit::Spades));
        assert_eq!(order.len(), 11);
        assert_eq!(order[1], Card::new(Rank::Ace, Suit::Spades));
    }

    #[test]
    fn joker_is_always_playable() {
        let bid = NoTrumpsBid::new(6);
        let mut trick = Trick::new(Seat::South);
        trick
            .play(Seat::South, Card::new(Rank::Nine, Suit::Clubs))
            .unwrap();
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Five, Suit::Clubs),
            Card::new(Rank::Ace, Suit::Hearts),
            Card::JOKER,
        ]);
        assert_eq!(bid.valid_plays(&trick, &hand, JokerSuit::UNBOUND), vec![0, 2]);
    }

    #[test]
    fn sort_groups_spades_diamonds_clubs_hearts_joker_last() {
        let bid = NoTrumpsBid::new(6);
        let mut hand = Hand::with_cards(vec![
            Card::JOKER,
            Card::new(Rank::Ace, Suit::Hearts),
            Card::new(Rank::Five, Suit::Hearts),
            Card::new(Rank::King, Suit::Clubs),
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::Ten, Suit::Spades),
            Card::new(Rank::Four, Suit::Diamonds),
        ]);
        bid.sort_hand(&mut hand);
        assert_eq!(
            hand.cards(),
            &[
                Card::new(Rank::Ten, Suit::Spades),
                Card::new(Rank::Ace, Suit::Spades),
                Card::new(Rank::Four, Suit::Diamonds),
                Card::new(Rank::King, Suit::Clubs),
                Card::new(Rank::Five, Suit::Hearts),
                Card::new(Rank::Ace, Suit::Hearts),
                Card::JOKER,
            ]
        );
    }
}
