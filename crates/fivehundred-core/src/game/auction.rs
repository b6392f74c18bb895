use crate::bid::{Bid, BidError};
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub seat: Seat,
    pub bid: Bid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStatus {
    Open { next: Seat },
    Won { contractor: Seat, bid: Bid },
    Redeal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("the auction is closed")]
    Closed,
    #[error("expected {expected} to bid but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{bid} does not outbid {current}")]
    NotHigher { bid: Bid, current: Bid },
    #[error(transparent)]
    Invalid(#[from] BidError),
}

/// Bidding round. Seats bid in rotation; a seat that passes is out for the rest of the
/// auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    next: Seat,
    passed: [bool; 4],
    winning: Option<BidRecord>,
    history: Vec<BidRecord>,
}

impl Auction {
    pub fn new(first: Seat) -> Self {
        Self {
            next: first,
            passed: [false; 4],
            winning: None,
            history: Vec::new(),
        }
    }

    pub fn winning(&self) -> Option<BidRecord> {
        self.winning
    }

    pub fn history(&self) -> &[BidRecord] {
        &self.history
    }

    pub fn has_passed(&self, seat: Seat) -> bool {
        self.passed[seat.index()]
    }

    pub fn status(&self) -> AuctionStatus {
        let passes = self.passed.iter().filter(|&&passed| passed).count();
        match self.winning {
            _ if passes == 4 => AuctionStatus::Redeal,
            Some(record) if passes == 3 => AuctionStatus::Won {
                contractor: record.seat,
                bid: record.bid,
            },
            _ => AuctionStatus::Open { next: self.next },
        }
    }

    /// Whether `bid` would be accepted from the seat on turn.
    pub fn check(&self, bid: Bid) -> Result<(), AuctionError> {
        if !matches!(self.status(), AuctionStatus::Open { .. }) {
            return Err(AuctionError::Closed);
        }
        if bid.is_pass() {
            return Ok(());
        }
        bid.validate()?;
        let current = self.winning.map(|record| record.bid);
        if bid.outbids(current) {
            Ok(())
        } else {
            Err(AuctionError::NotHigher {
                bid,
                current: current.unwrap_or(Bid::Pass),
            })
        }
    }

    pub fn submit(&mut self, seat: Seat, bid: Bid) -> Result<AuctionStatus, AuctionError> {
        self.check(bid)?;
        if seat != self.next {
            return Err(AuctionError::OutOfTurn {
                expected: self.next,
                actual: seat,
            });
        }

        let record = BidRecord { seat, bid };
        if bid.is_pass() {
            self.passed[seat.index()] = true;
        } else {
            self.winning = Some(record);
        }
        self.history.push(record);

        let status = self.status();
        if matches!(status, AuctionStatus::Open { .. }) {
            self.advance();
        }
        Ok(self.status())
    }

    fn advance(&mut self) {
        let mut seat = self.next.next();
        while self.passed[seat.index()] {
            seat = seat.next();
        }
        self.next = seat;
    }
}
