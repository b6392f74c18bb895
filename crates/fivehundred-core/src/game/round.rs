use crate::bid::{Bid, JokerAlreadyBound, JokerSuit, Rules, sort_unbid};
use crate::game::auction::{Auction, AuctionError, AuctionStatus, BidRecord};
use crate::game::outcome::HandResult;
use crate::model::card::Card;
use crate::model::deck::{Deal, Deck, HAND_SIZE, KITTY_SIZE};
use crate::model::hand::Hand;
use crate::model::player::Seat;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Bidding,
    Discarding,
    Playing,
    Finished,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoundPhase::Bidding => "bidding",
            RoundPhase::Discarding => "discarding",
            RoundPhase::Playing => "playing",
            RoundPhase::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Winning bid and the seat that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub bid: Bid,
    pub contractor: Seat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickRecord {
    pub trick: Trick,
    pub winner: Seat,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    #[error("cards can only be dropped while discarding, not while {0}")]
    WrongPhase(RoundPhase),
    #[error("{0} did not win the auction")]
    NotContractor(Seat),
    #[error("exactly {KITTY_SIZE} cards must be dropped, got {0}")]
    WrongCount(usize),
    #[error("card {0} selected more than once")]
    Duplicate(usize),
    #[error("card {index} is outside a hand of {len}")]
    OutOfRange { index: usize, len: usize },
}

impl DropError {
    /// Errors caused by the chosen indices rather than by sequencing.
    pub fn is_invalid_selection(&self) -> bool {
        matches!(
            self,
            DropError::WrongCount(_) | DropError::Duplicate(_) | DropError::OutOfRange { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("cards can only be played while playing, not while {0}")]
    WrongPhase(RoundPhase),
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("card {index} is not a legal play (legal: {valid:?})")]
    IllegalPlay { index: usize, valid: Vec<usize> },
    #[error("the joker was led and its suit has not been called")]
    JokerSuitPending,
    #[error("no joker lead is waiting for a suit")]
    NoJokerCall,
    #[error(transparent)]
    JokerAlreadyBound(#[from] JokerAlreadyBound),
    #[error(transparent)]
    Trick(#[from] TrickError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Played { card: Card },
    /// The Joker was led under no-trumps or misère; the leader must call its suit.
    JokerLed,
    TrickCompleted { card: Card, winner: Seat },
    HandCompleted {
        card: Card,
        winner: Seat,
        result: HandResult,
    },
}

/// One hand of 500, from the deal to the last trick.
#[derive(Debug, Clone)]
pub struct RoundState {
    hands: [Hand; 4],
    kitty: Vec<Card>,
    auction: Auction,
    contract: Option<Contract>,
    joker: JokerSuit,
    joker_call_pending: bool,
    current_trick: Trick,
    trick_history: Vec<TrickRecord>,
    discarded: Vec<Card>,
    phase: RoundPhase,
    result: Option<HandResult>,
}

impl RoundState {
    pub fn deal(deck: &Deck, first_bidder: Seat) -> Self {
        Self::from_deal(deck.deal(), first_bidder)
    }

    pub fn from_deal(deal: Deal, first_bidder: Seat) -> Self {
        let Deal { hands, kitty } = deal;
        let mut hands = hands.map(Hand::with_cards);
        for hand in &mut hands {
            sort_unbid(hand);
        }

        Self {
            hands,
            kitty: kitty.to_vec(),
            auction: Auction::new(first_bidder),
            contract: None,
            joker: JokerSuit::UNBOUND,
            joker_call_pending: false,
            current_trick: Trick::new(first_bidder),
            trick_history: Vec::new(),
            discarded: Vec::new(),
            phase: RoundPhase::Bidding,
            result: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn hands(&self) -> &[Hand; 4] {
        &self.hands
    }

    /// Undealt cards; empty once awarded to the contractor.
    pub fn kitty(&self) -> &[Card] {
        &self.kitty
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discarded
    }

    pub fn auction(&self) -> &Auction {
        &self.auction
    }

    pub fn bid_history(&self) -> &[BidRecord] {
        self.auction.history()
    }

    pub fn contract(&self) -> Option<Contract> {
        self.contract
    }

    pub fn joker_suit(&self) -> JokerSuit {
        self.joker
    }

    pub fn joker_call_pending(&self) -> bool {
        self.joker_call_pending
    }

    /// Rules of the contract with the current joker binding; `None` until the auction
    /// closes with a bid.
    pub fn rules(&self) -> Option<Rules> {
        self.contract
            .map(|contract| Rules::new(contract.bid, self.joker))
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[TrickRecord] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn result(&self) -> Option<HandResult> {
        self.result
    }

    pub fn next_bidder(&self) -> Option<Seat> {
        match self.auction.status() {
            AuctionStatus::Open { next } if self.phase == RoundPhase::Bidding => Some(next),
            _ => None,
        }
    }

    /// Seat due to play, or `None` outside the playing phase and while a joker call is
    /// outstanding.
    pub fn next_to_play(&self) -> Option<Seat> {
        (self.phase == RoundPhase::Playing && !self.joker_call_pending)
            .then(|| self.current_trick.expected_seat())
    }

    pub fn submit_bid(&mut self, seat: Seat, bid: Bid) -> Result<AuctionStatus, AuctionError> {
        if self.phase != RoundPhase::Bidding {
            return Err(AuctionError::Closed);
        }

        let status = self.auction.submit(seat, bid)?;
        debug!(target: "fivehundred::round", %seat, %bid, "bid accepted");

        match status {
            AuctionStatus::Open { .. } => {}
            AuctionStatus::Redeal => {
                info!(target: "fivehundred::round", "all seats passed");
                self.finish(HandResult::Redeal);
            }
            AuctionStatus::Won { contractor, bid } => {
                info!(target: "fivehundred::round", %contractor, %bid, "auction closed");
                self.award_contract(Contract { bid, contractor });
            }
        }
        Ok(status)
    }

    fn award_contract(&mut self, contract: Contract) {
        self.contract = Some(contract);
        let rules = Rules::new(contract.bid, self.joker);
        for hand in &mut self.hands {
            rules.sort_hand(hand);
        }
        let hand = &mut self.hands[contract.contractor.index()];
        hand.extend(self.kitty.drain(..));
        rules.sort_hand(hand);
        self.phase = RoundPhase::Discarding;
    }

    /// Removes three cards from the contractor's hand and opens the first trick, led by
    /// the contractor.
    pub fn drop_cards(&mut self, seat: Seat, indices: &[usize]) -> Result<Vec<Card>, DropError> {
        if self.phase != RoundPhase::Discarding {
            return Err(DropError::WrongPhase(self.phase));
        }
        let Some(contract) = self.contract else {
            return Err(DropError::WrongPhase(self.phase));
        };
        if seat != contract.contractor {
            return Err(DropError::NotContractor(seat));
        }
        if indices.len() != KITTY_SIZE {
            return Err(DropError::WrongCount(indices.len()));
        }

        let len = self.hands[seat.index()].len();
        for (position, &index) in indices.iter().enumerate() {
            if index >= len {
                return Err(DropError::OutOfRange { index, len });
            }
            if indices[..position].contains(&index) {
                return Err(DropError::Duplicate(index));
            }
        }

        let dropped = self.hands[seat.index()].remove_indices(indices);
        debug!(target: "fivehundred::round", %seat, ?dropped, "kitty dropped");
        self.discarded = dropped.clone();

        let sitting_out = contract
            .bid
            .is_misere()
            .then(|| contract.contractor.partner());
        self.current_trick = Trick::with_sitting_out(contract.contractor, sitting_out);
        self.phase = RoundPhase::Playing;
        Ok(dropped)
    }

    /// Legal indices into `seat`'s hand; empty when it is not that seat's turn.
    pub fn valid_plays(&self, seat: Seat) -> Vec<usize> {
        match (self.next_to_play(), self.rules()) {
            (Some(next), Some(rules)) if next == seat => {
                rules.valid_plays(&self.current_trick, &self.hands[seat.index()])
            }
            _ => Vec::new(),
        }
    }

    pub fn play_card(&mut self, seat: Seat, index: usize) -> Result<PlayOutcome, PlayError> {
        if self.phase != RoundPhase::Playing {
            return Err(PlayError::WrongPhase(self.phase));
        }
        let Some(contract) = self.contract else {
            return Err(PlayError::WrongPhase(self.phase));
        };
        if self.joker_call_pending {
            return Err(PlayError::JokerSuitPending);
        }
        let expected = self.current_trick.expected_seat();
        if seat != expected {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        let valid = self.valid_plays(seat);
        if !valid.contains(&index) {
            return Err(PlayError::IllegalPlay { index, valid });
        }

        let hand = &mut self.hands[seat.index()];
        let Some(card) = hand.remove_at(index) else {
            return Err(PlayError::IllegalPlay { index, valid });
        };
        let leading = self.current_trick.is_empty();
        self.current_trick.play(seat, card)?;
        debug!(target: "fivehundred::round", %seat, %card, "card played");

        if leading && card.is_joker() && contract.bid.calls_joker_suit() {
            self.joker_call_pending = true;
            return Ok(PlayOutcome::JokerLed);
        }

        if !self.current_trick.is_complete() {
            return Ok(PlayOutcome::Played { card });
        }

        let Some(winner) = self.rules().and_then(|rules| self.current_trick.winner(&rules))
        else {
            return Ok(PlayOutcome::Played { card });
        };
        info!(target: "fivehundred::round", %winner, trick = self.trick_history.len() + 1, "trick won");

        let next = Trick::with_sitting_out(winner, self.current_trick.sitting_out());
        let trick = std::mem::replace(&mut self.current_trick, next);
        self.trick_history.push(TrickRecord { trick, winner });

        if self.trick_history.len() < HAND_SIZE {
            return Ok(PlayOutcome::TrickCompleted { card, winner });
        }

        let tricks = self.team_tricks(contract.contractor);
        let result = if Rules::new(contract.bid, self.joker).won(tricks) {
            HandResult::BidWon {
                bid: contract.bid,
                contractor: contract.contractor,
                tricks,
            }
        } else {
            HandResult::BidLost {
                bid: contract.bid,
                contractor: contract.contractor,
                tricks,
            }
        };
        info!(target: "fivehundred::round", %result, "hand finished");
        self.finish(result);
        Ok(PlayOutcome::HandCompleted {
            card,
            winner,
            result,
        })
    }

    /// Calls the suit of a led Joker. Only the leader may call, once per hand.
    pub fn bind_joker_suit(&mut self, seat: Seat, suit: Suit) -> Result<(), PlayError> {
        if !self.joker_call_pending {
            return Err(PlayError::NoJokerCall);
        }
        let leader = self.current_trick.leader();
        if seat != leader {
            return Err(PlayError::OutOfTurn {
                expected: leader,
                actual: seat,
            });
        }
        self.joker.bind(suit)?;
        self.joker_call_pending = false;
        debug!(target: "fivehundred::round", %seat, %suit, "joker suit called");
        Ok(())
    }

    pub fn tricks_won(&self, seat: Seat) -> usize {
        self.trick_history
            .iter()
            .filter(|record| record.winner == seat)
            .count()
    }

    /// Tricks won by `seat` and its partner.
    pub fn team_tricks(&self, seat: Seat) -> usize {
        self.trick_history
            .iter()
            .filter(|record| record.winner.same_team(seat))
            .count()
    }

    fn finish(&mut self, result: HandResult) {
        self.result = Some(result);
        self.phase = RoundPhase::Finished;
    }
}
