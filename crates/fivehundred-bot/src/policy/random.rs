use super::think;
use crate::player::{BidView, DropView, PlayView, Player, PlayerError};
use fivehundred_core::bid::Bid;
use fivehundred_core::model::deck::KITTY_SIZE;
use fivehundred_core::model::hand::Hand;
use fivehundred_core::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use std::time::Duration;

/// Never bids; plays a uniformly random legal card.
pub struct RandomPlayer {
    delay: Duration,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn bid(&mut self, _view: &BidView) -> Result<Bid, PlayerError> {
        think(self.delay);
        Ok(Bid::Pass)
    }

    fn drop3(&mut self, view: &DropView) -> Result<Vec<usize>, PlayerError> {
        let amount = KITTY_SIZE.min(view.hand.len());
        let mut chosen = index::sample(&mut self.rng, view.hand.len(), amount).into_vec();
        chosen.sort_unstable();
        Ok(chosen)
    }

    fn play(&mut self, view: &PlayView) -> Result<usize, PlayerError> {
        think(self.delay);
        view.valid
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| PlayerError::Protocol("asked to play with no legal cards".into()))
    }

    fn joker_suit(&mut self, _hand: &Hand) -> Result<Suit, PlayerError> {
        think(self.delay);
        Ok(*Suit::ALL.choose(&mut self.rng).unwrap_or(&Suit::Spades))
    }
}
