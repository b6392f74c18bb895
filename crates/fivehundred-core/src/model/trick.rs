use crate::bid::Rules;
use crate::model::card::Card;
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One round of plays. A seat may sit out (the contractor's partner in misère), in which
/// case the trick completes after three plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: Seat,
    sitting_out: Option<Seat>,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} has already played this trick")]
    AlreadyPlayed(Seat),
    #[error("{0} sits out this hand")]
    SittingOut(Seat),
}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self::with_sitting_out(leader, None)
    }

    pub fn with_sitting_out(leader: Seat, sitting_out: Option<Seat>) -> Self {
        Self {
            leader,
            sitting_out,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn sitting_out(&self) -> Option<Seat> {
        self.sitting_out
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn size(&self) -> usize {
        if self.sitting_out.is_some() { 3 } else { 4 }
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.size()
    }

    pub fn lead_card(&self) -> Option<Card> {
        self.plays.first().map(|play| play.card)
    }

    pub fn card_of(&self, seat: Seat) -> Option<Card> {
        self.plays
            .iter()
            .find(|play| play.seat == seat)
            .map(|play| play.card)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.sitting_out == Some(seat) {
            return Err(TrickError::SittingOut(seat));
        }

        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        let expected = self.expected_seat();
        if expected != seat {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// Seat due to play next, skipping a seat that sits out.
    pub fn expected_seat(&self) -> Seat {
        let next = self
            .plays
            .last()
            .map(|play| play.seat.next())
            .unwrap_or(self.leader);
        if Some(next) == self.sitting_out {
            next.next()
        } else {
            next
        }
    }

    /// Seat currently holding the trick: the played card earliest in the contract's
    /// ranking for this lead. Falls back to the leader when no played card ranks.
    pub fn winner(&self, rules: &Rules) -> Option<Seat> {
        let lead = self.lead_card()?;
        let winner = rules
            .card_order(lead)
            .into_iter()
            .find_map(|ranked| {
                self.plays
                    .iter()
                    .find(|play| play.card == ranked)
                    .map(|play| play.seat)
            })
            .unwrap_or(self.leader);
        Some(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::{Trick, TrickError};
    use crate::bid::{Bid, JokerSuit, Rules};
    use crate::model::card::Card;
    use crate::model::player::Seat;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(Seat::South);
        assert!(
            trick
                .play(Seat::South, Card::new(Rank::Five, Suit::Clubs))
                .is_ok()
        );
        assert!(matches!(
            trick.play(Seat::North, Card::new(Rank::Six, Suit::Clubs)),
            Err(TrickError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn misere_trick_skips_partner() {
        let mut trick = Trick::with_sitting_out(Seat::West, Some(Seat::North));
        trick
            .play(Seat::West, Card::new(Rank::Five, Suit::Clubs))
            .unwrap();
        assert_eq!(trick.expected_seat(), Seat::East);
        assert_eq!(
            trick.play(Seat::North, Card::new(Rank::Six, Suit::Clubs)),
            Err(TrickError::SittingOut(Seat::North))
        );
        trick
            .play(Seat::East, Card::new(Rank::Six, Suit::Clubs))
            .unwrap();
        trick
            .play(Seat::South, Card::new(Rank::Seven, Suit::Clubs))
            .unwrap();
        assert!(trick.is_complete());
        assert_eq!(
            trick.play(Seat::West, Card::new(Rank::Eight, Suit::Clubs)),
            Err(TrickError::TrickComplete)
        );
    }

    #[test]
    fn misere_lead_ace_beats_lower_card_of_suit() {
        let mut trick = Trick::with_sitting_out(Seat::East, Some(Seat::North));
        trick
            .play(Seat::East, Card::new(Rank::Ace, Suit::Diamonds))
            .unwrap();
        trick
            .play(Seat::South, Card::new(Rank::King, Suit::Spades))
            .unwrap();
        trick
            .play(Seat::West, Card::new(Rank::Five, Suit::Diamonds))
            .unwrap();
        let rules = Bid::misere(false).rules();
        assert_eq!(trick.winner(&rules), Some(Seat::East));
    }

    #[test]
    fn trump_beats_off_suit_ace() {
        let mut trick = Trick::new(Seat::South);
        trick
            .play(Seat::South, Card::new(Rank::Ace, Suit::Clubs))
            .unwrap();
        trick
            .play(Seat::West, Card::new(Rank::Five, Suit::Hearts))
            .unwrap();
        trick
            .play(Seat::North, Card::new(Rank::King, Suit::Clubs))
            .unwrap();
        trick
            .play(Seat::East, Card::new(Rank::Jack, Suit::Diamonds))
            .unwrap();
        let rules = Bid::suit(6, Suit::Hearts).rules();
        assert_eq!(trick.winner(&rules), Some(Seat::East));
    }

    #[test]
    fn joker_wins_no_trumps_trick() {
        let mut trick = Trick::new(Seat::North);
        trick
            .play(Seat::North, Card::new(Rank::Ace, Suit::Spades))
            .unwrap();
        trick.play(Seat::East, Card::JOKER).unwrap();
        let rules = Rules::new(Bid::no_trumps(7), JokerSuit::UNBOUND);
        assert_eq!(trick.winner(&rules), Some(Seat::East));
    }

    #[test]
    fn partial_and_empty_tricks() {
        let rules = Bid::suit(6, Suit::Spades).rules();
        let mut trick = Trick::new(Seat::West);
        assert_eq!(trick.winner(&rules), None);
        trick
            .play(Seat::West, Card::new(Rank::Nine, Suit::Diamonds))
            .unwrap();
        trick
            .play(Seat::North, Card::new(Rank::Ten, Suit::Diamonds))
            .unwrap();
        assert_eq!(trick.winner(&rules), Some(Seat::North));
        assert!(!trick.is_complete());
    }
}
