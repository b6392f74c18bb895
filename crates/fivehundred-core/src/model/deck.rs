use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::array;

pub const DECK_SIZE: usize = 43;
pub const HAND_SIZE: usize = 10;
pub const KITTY_SIZE: usize = 3;

/// The 43-card 500 deck: 5 through Ace in every suit, the two red 4s and the Joker.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

/// Cards split for one hand: ten per seat plus the kitty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: [Vec<Card>; 4],
    pub kitty: [Card; KITTY_SIZE],
}

impl Deck {
    pub fn five_hundred() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        cards.push(Card::new(Rank::Four, Suit::Diamonds));
        cards.push(Card::new(Rank::Four, Suit::Hearts));
        for rank in Rank::PLAIN.iter().copied().skip(1) {
            for suit in Suit::ALL.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        cards.push(Card::JOKER);
        Self { cards }
    }

    /// Membership in the 500 deck definition, independent of any shuffle.
    pub fn includes(card: Card) -> bool {
        match (card.rank, card.suit) {
            (Rank::Joker, None) => true,
            (Rank::Joker, Some(_)) => false,
            (_, None) => false,
            (Rank::Four, Some(suit)) => suit.is_red(),
            (_, Some(_)) => true,
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::five_hundred();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Ten consecutive cards per seat in seat order; the last three form the kitty.
    pub fn deal(&self) -> Deal {
        let hands = array::from_fn(|seat| {
            self.cards[seat * HAND_SIZE..(seat + 1) * HAND_SIZE].to_vec()
        });
        let base = 4 * HAND_SIZE;
        let kitty = [self.cards[base], self.cards[base + 1], self.cards[base + 2]];
        Deal { hands, kitty }
    }
}
