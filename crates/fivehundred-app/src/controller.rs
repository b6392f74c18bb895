use fivehundred_bot::{BidView, DropView, PlayView, Player, PlayerError};
use fivehundred_core::bid::{Bid, Rules};
use fivehundred_core::game::auction::{AuctionError, AuctionStatus};
use fivehundred_core::game::outcome::HandResult;
use fivehundred_core::game::round::{DropError, PlayError, PlayOutcome, RoundState};
use fivehundred_core::game::serialization::RoundSnapshot;
use fivehundred_core::model::card::Card;
use fivehundred_core::model::deck::Deck;
use fivehundred_core::model::player::Seat;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const TARGET: &str = "fivehundred::controller";

/// Bidding always opens with the first seat.
pub const FIRST_BIDDER: Seat = Seat::South;

#[derive(Debug, Clone, Default)]
pub struct ControllerSettings {
    /// Pause before a forced play is made on a seat's behalf.
    pub bot_delay: Duration,
    /// Where to write a JSON snapshot after every step.
    pub gamestate_log: Option<PathBuf>,
}

/// A rules error the controller did not expect: the table itself is out of sequence.
#[derive(Debug, Error)]
pub enum RoundError {
    #[error(transparent)]
    Auction(#[from] AuctionError),
    #[error(transparent)]
    Drop(#[from] DropError),
    #[error(transparent)]
    Play(#[from] PlayError),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{seat} can no longer play: {source}")]
    Player {
        seat: Seat,
        #[source]
        source: PlayerError,
    },
    #[error("hand out of sequence: {0}")]
    Rules(#[from] RoundError),
}

enum Verdict<T> {
    Accept(T),
    Retry(String),
}

/// Asks a seat until its answer is accepted. Invalid answers are logged and asked
/// again; a player or sequencing error ends the loop.
fn retry_until_valid<T>(
    seat: Seat,
    request: &'static str,
    mut attempt: impl FnMut() -> Result<Verdict<T>, ControllerError>,
) -> Result<T, ControllerError> {
    loop {
        match attempt()? {
            Verdict::Accept(value) => return Ok(value),
            Verdict::Retry(reason) => {
                warn!(target: TARGET, %seat, request, %reason, "invalid response, asking again");
            }
        }
    }
}

fn player_error(seat: Seat) -> impl FnOnce(PlayerError) -> ControllerError {
    move |source| ControllerError::Player { seat, source }
}

/// Runs hands of 500 between four players. The controller owns the round state and
/// hands each player a read-only view when it needs a decision.
pub struct GameController {
    players: [Box<dyn Player>; 4],
    settings: ControllerSettings,
    last_round: Option<RoundState>,
}

impl GameController {
    /// `players` are indexed by seat, South first.
    pub fn new(players: [Box<dyn Player>; 4], settings: ControllerSettings) -> Self {
        Self {
            players,
            settings,
            last_round: None,
        }
    }

    /// State of the most recent hand, finished or aborted.
    pub fn last_round(&self) -> Option<&RoundState> {
        self.last_round.as_ref()
    }

    pub fn play_hand(&mut self, deck: &Deck) -> Result<HandResult, ControllerError> {
        let mut round = RoundState::deal(deck, FIRST_BIDDER);
        let outcome = self.run(&mut round);
        if let Err(err) = &outcome {
            warn!(target: TARGET, error = %err, phase = %round.phase(), "hand aborted");
        }
        self.last_round = Some(round);
        outcome
    }

    fn run(&mut self, round: &mut RoundState) -> Result<HandResult, ControllerError> {
        for seat in Seat::LOOP {
            let player = &mut self.players[seat.index()];
            player.notify_seat(seat);
            player.notify_hand(round.hand(seat));
        }
        self.dump(round);

        while let Some(seat) = round.next_bidder() {
            let (bid, status) = self.request_bid(round, seat)?;
            self.broadcast(|player| player.notify_bid(seat, bid));
            if let AuctionStatus::Won { contractor, bid } = status {
                self.broadcast(|player| player.notify_bid_winner(contractor, bid));
                for seat in Seat::LOOP {
                    self.players[seat.index()].notify_hand(round.hand(seat));
                }
            }
            self.dump(round);
        }

        if let Some(result) = round.result() {
            return Ok(self.finish(result));
        }
        let Some(contract) = round.contract() else {
            return Err(RoundError::Drop(DropError::WrongPhase(round.phase())).into());
        };

        let contractor = contract.contractor;
        let rules = Rules::new(contract.bid, round.joker_suit());
        self.request_drop(round, contractor, rules)?;
        self.players[contractor.index()].notify_hand(round.hand(contractor));
        self.dump(round);

        loop {
            let Some(seat) = round.next_to_play() else {
                return Err(RoundError::Play(PlayError::WrongPhase(round.phase())).into());
            };
            let index = self.request_play(round, seat)?;
            let outcome = round.play_card(seat, index).map_err(RoundError::from)?;

            let card = match outcome {
                PlayOutcome::Played { card }
                | PlayOutcome::TrickCompleted { card, .. }
                | PlayOutcome::HandCompleted { card, .. } => card,
                PlayOutcome::JokerLed => {
                    self.request_joker_suit(round, seat)?;
                    Card::JOKER
                }
            };
            self.broadcast(|player| player.notify_play(seat, card));
            self.players[seat.index()].notify_hand(round.hand(seat));

            match outcome {
                PlayOutcome::TrickCompleted { winner, .. } => {
                    self.broadcast(|player| player.notify_trick_winner(winner));
                }
                PlayOutcome::HandCompleted { winner, result, .. } => {
                    self.broadcast(|player| player.notify_trick_winner(winner));
                    self.dump(round);
                    return Ok(self.finish(result));
                }
                PlayOutcome::Played { .. } | PlayOutcome::JokerLed => {}
            }
            self.dump(round);
        }
    }

    fn request_bid(
        &mut self,
        round: &mut RoundState,
        seat: Seat,
    ) -> Result<(Bid, AuctionStatus), ControllerError> {
        let player = &mut self.players[seat.index()];
        retry_until_valid(seat, "bid", || {
            let view = BidView {
                seat,
                hand: round.hand(seat),
                current: round.auction().winning(),
                history: round.bid_history(),
            };
            let bid = player.bid(&view).map_err(player_error(seat))?;
            match round.submit_bid(seat, bid) {
                Ok(status) => Ok(Verdict::Accept((bid, status))),
                Err(err @ (AuctionError::NotHigher { .. } | AuctionError::Invalid(_))) => {
                    Ok(Verdict::Retry(err.to_string()))
                }
                Err(err) => Err(RoundError::from(err).into()),
            }
        })
    }

    fn request_drop(
        &mut self,
        round: &mut RoundState,
        seat: Seat,
        rules: Rules,
    ) -> Result<Vec<Card>, ControllerError> {
        let player = &mut self.players[seat.index()];
        retry_until_valid(seat, "drop", || {
            let view = DropView {
                seat,
                hand: round.hand(seat),
                rules,
            };
            let indices = player.drop3(&view).map_err(player_error(seat))?;
            match round.drop_cards(seat, &indices) {
                Ok(dropped) => Ok(Verdict::Accept(dropped)),
                Err(err) if err.is_invalid_selection() => Ok(Verdict::Retry(err.to_string())),
                Err(err) => Err(RoundError::from(err).into()),
            }
        })
    }

    fn request_play(&mut self, round: &RoundState, seat: Seat) -> Result<usize, ControllerError> {
        let valid = round.valid_plays(seat);
        let (Some(rules), Some(contract)) = (round.rules(), round.contract()) else {
            return Err(RoundError::Play(PlayError::WrongPhase(round.phase())).into());
        };
        if valid.is_empty() {
            return Err(RoundError::Play(PlayError::IllegalPlay { index: 0, valid }).into());
        }
        if let &[only] = valid.as_slice() {
            self.pause();
            debug!(target: TARGET, %seat, index = only, "single legal play made automatically");
            return Ok(only);
        }

        let player = &mut self.players[seat.index()];
        retry_until_valid(seat, "play", || {
            let view = PlayView {
                seat,
                hand: round.hand(seat),
                trick: round.current_trick(),
                valid: &valid,
                rules,
                contract,
            };
            let index = player.play(&view).map_err(player_error(seat))?;
            if valid.contains(&index) {
                Ok(Verdict::Accept(index))
            } else {
                Ok(Verdict::Retry(format!(
                    "card {index} is not a legal play (legal: {valid:?})"
                )))
            }
        })
    }

    fn request_joker_suit(
        &mut self,
        round: &mut RoundState,
        seat: Seat,
    ) -> Result<(), ControllerError> {
        let suit = self.players[seat.index()]
            .joker_suit(round.hand(seat))
            .map_err(player_error(seat))?;
        round.bind_joker_suit(seat, suit).map_err(RoundError::from)?;
        info!(target: TARGET, %seat, %suit, "joker suit called");
        Ok(())
    }

    fn finish(&mut self, result: HandResult) -> HandResult {
        info!(target: TARGET, %result, "hand result");
        self.broadcast(|player| player.notify_hand_result(&result));
        result
    }

    fn broadcast(&mut self, mut event: impl FnMut(&mut dyn Player)) {
        for player in &mut self.players {
            event(player.as_mut());
        }
    }

    fn pause(&self) {
        if !self.settings.bot_delay.is_zero() {
            thread::sleep(self.settings.bot_delay);
        }
    }

    fn dump(&self, round: &RoundState) {
        let Some(path) = &self.settings.gamestate_log else {
            return;
        };
        let written = RoundSnapshot::to_json(round)
            .map_err(io::Error::from)
            .and_then(|json| fs::write(path, json));
        if let Err(err) = written {
            warn!(target: TARGET, path = %path.display(), error = %err, "failed to write game state");
        }
    }
}
