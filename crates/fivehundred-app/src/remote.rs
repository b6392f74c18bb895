//! Line-delimited JSON protocol between a table and a player joining it over TCP.
//!
//! The table sends [`TableMessage`]s: events, which need no answer, and requests, each
//! answered by exactly one [`ClientMessage`]. Cards travel as [`WireCard`]s.

use fivehundred_bot::{BidView, DropView, PlayView, Player, PlayerError};
use fivehundred_core::bid::{Bid, JokerSuit, Rules};
use fivehundred_core::game::auction::BidRecord;
use fivehundred_core::game::outcome::HandResult;
use fivehundred_core::game::round::Contract;
use fivehundred_core::model::card::Card;
use fivehundred_core::model::deck::Deck;
use fivehundred_core::model::hand::Hand;
use fivehundred_core::model::player::Seat;
use fivehundred_core::model::rank::Rank;
use fivehundred_core::model::suit::Suit;
use fivehundred_core::model::trick::Trick;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;
use tracing::{debug, info, warn};

const TARGET: &str = "fivehundred::remote";

/// A card on the wire: `rank` is the pip value (Ace 1, Jack 11, Joker 14) and `suit`
/// is lowercase, or null for the Joker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCard {
    pub rank: u8,
    pub suit: Option<Suit>,
}

impl From<Card> for WireCard {
    fn from(card: Card) -> Self {
        Self {
            rank: card.rank.value(),
            suit: card.suit,
        }
    }
}

impl TryFrom<WireCard> for Card {
    type Error = PlayerError;

    fn try_from(wire: WireCard) -> Result<Self, Self::Error> {
        let rank = Rank::from_value(wire.rank)
            .ok_or_else(|| PlayerError::Protocol(format!("unknown rank {}", wire.rank)))?;
        let card = Card {
            rank,
            suit: wire.suit,
        };
        if Deck::includes(card) {
            Ok(card)
        } else {
            Err(PlayerError::Protocol(format!("{card} is not in the deck")))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePlay {
    pub seat: Seat,
    pub card: WireCard,
}

/// Table to player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableMessage {
    Seat {
        seat: Seat,
    },
    Hand {
        cards: Vec<WireCard>,
    },
    BidMade {
        seat: Seat,
        bid: Bid,
    },
    BidWinner {
        contractor: Seat,
        bid: Bid,
    },
    CardPlayed {
        seat: Seat,
        card: WireCard,
    },
    TrickWinner {
        winner: Seat,
    },
    #[serde(rename = "hand_result")]
    Outcome {
        result: HandResult,
    },
    BidRequest {
        seat: Seat,
        hand: Vec<WireCard>,
        current: Option<BidRecord>,
        history: Vec<BidRecord>,
    },
    DropRequest {
        seat: Seat,
        hand: Vec<WireCard>,
        contract: Bid,
    },
    PlayRequest {
        seat: Seat,
        hand: Vec<WireCard>,
        leader: Seat,
        sitting_out: Option<Seat>,
        plays: Vec<WirePlay>,
        valid: Vec<usize>,
        contract: Contract,
        joker_suit: Option<Suit>,
    },
    JokerSuitRequest {
        hand: Vec<WireCard>,
    },
}

/// Player to table, one per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Bid { bid: Bid },
    Drop { indices: Vec<usize> },
    Play { index: usize },
    JokerSuit { suit: Suit },
}

impl ClientMessage {
    fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Bid { .. } => "bid",
            ClientMessage::Drop { .. } => "drop",
            ClientMessage::Play { .. } => "play",
            ClientMessage::JokerSuit { .. } => "joker_suit",
        }
    }
}

fn encode_hand(hand: &Hand) -> Vec<WireCard> {
    hand.iter().map(|&card| WireCard::from(card)).collect()
}

fn decode_hand(cards: Vec<WireCard>) -> Result<Hand, PlayerError> {
    let cards = cards
        .into_iter()
        .map(Card::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Hand::with_cards(cards))
}

fn transport_error(err: io::Error) -> PlayerError {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => PlayerError::Timeout,
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted => PlayerError::Closed,
        _ => PlayerError::Io(err),
    }
}

fn read_message<T: DeserializeOwned>(reader: &mut impl BufRead) -> Result<T, PlayerError> {
    let mut line = String::new();
    if reader.read_line(&mut line).map_err(transport_error)? == 0 {
        return Err(PlayerError::Closed);
    }
    serde_json::from_str(line.trim()).map_err(|err| PlayerError::Protocol(err.to_string()))
}

fn write_message<T: Serialize>(writer: &mut impl Write, message: &T) -> Result<(), PlayerError> {
    let mut line =
        serde_json::to_string(message).map_err(|err| PlayerError::Protocol(err.to_string()))?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(transport_error)
}

fn unexpected(expected: &str, reply: &ClientMessage) -> PlayerError {
    PlayerError::Protocol(format!(
        "expected a {expected} reply, received {}",
        reply.kind()
    ))
}

/// Table side of a remote seat. Socket timeouts bound every exchange; an expired
/// timeout surfaces as [`PlayerError::Timeout`].
pub struct RemotePlayer {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    peer: String,
    closed: bool,
}

impl RemotePlayer {
    /// Listens on `addr` and waits for one player to join.
    pub fn accept(addr: &str, timeout: Duration) -> Result<Self, PlayerError> {
        let listener = TcpListener::bind(addr)?;
        info!(target: TARGET, %addr, "waiting for a remote player");
        let (stream, _) = listener.accept()?;
        Self::from_stream(stream, timeout)
    }

    pub fn from_stream(stream: TcpStream, timeout: Duration) -> Result<Self, PlayerError> {
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        info!(target: TARGET, %peer, "remote player joined");
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            peer,
            closed: false,
        })
    }

    fn send(&mut self, message: &TableMessage) -> Result<(), PlayerError> {
        if self.closed {
            return Err(PlayerError::Closed);
        }
        write_message(&mut self.writer, message)
    }

    fn notify(&mut self, message: TableMessage) {
        if self.closed {
            return;
        }
        if let Err(err) = self.send(&message) {
            warn!(target: TARGET, peer = %self.peer, error = %err, "remote player dropped an event");
            self.closed = true;
        }
    }

    fn request(&mut self, message: TableMessage) -> Result<ClientMessage, PlayerError> {
        self.send(&message)?;
        let reply = read_message(&mut self.reader);
        if let Err(err) = &reply {
            warn!(target: TARGET, peer = %self.peer, error = %err, "remote request failed");
            self.closed = true;
        }
        reply
    }
}

impl Player for RemotePlayer {
    fn notify_seat(&mut self, seat: Seat) {
        self.notify(TableMessage::Seat { seat });
    }

    fn notify_hand(&mut self, hand: &Hand) {
        self.notify(TableMessage::Hand {
            cards: encode_hand(hand),
        });
    }

    fn notify_bid(&mut self, seat: Seat, bid: Bid) {
        self.notify(TableMessage::BidMade { seat, bid });
    }

    fn notify_bid_winner(&mut self, contractor: Seat, bid: Bid) {
        self.notify(TableMessage::BidWinner { contractor, bid });
    }

    fn notify_play(&mut self, seat: Seat, card: Card) {
        self.notify(TableMessage::CardPlayed {
            seat,
            card: card.into(),
        });
    }

    fn notify_trick_winner(&mut self, winner: Seat) {
        self.notify(TableMessage::TrickWinner { winner });
    }

    fn notify_hand_result(&mut self, result: &HandResult) {
        self.notify(TableMessage::Outcome { result: *result });
    }

    fn bid(&mut self, view: &BidView) -> Result<Bid, PlayerError> {
        let reply = self.request(TableMessage::BidRequest {
            seat: view.seat,
            hand: encode_hand(view.hand),
            current: view.current,
            history: view.history.to_vec(),
        })?;
        match reply {
            ClientMessage::Bid { bid } => Ok(bid),
            other => Err(unexpected("bid", &other)),
        }
    }

    fn drop3(&mut self, view: &DropView) -> Result<Vec<usize>, PlayerError> {
        let reply = self.request(TableMessage::DropRequest {
            seat: view.seat,
            hand: encode_hand(view.hand),
            contract: view.rules.bid(),
        })?;
        match reply {
            ClientMessage::Drop { indices } => Ok(indices),
            other => Err(unexpected("drop", &other)),
        }
    }

    fn play(&mut self, view: &PlayView) -> Result<usize, PlayerError> {
        let reply = self.request(TableMessage::PlayRequest {
            seat: view.seat,
            hand: encode_hand(view.hand),
            leader: view.trick.leader(),
            sitting_out: view.trick.sitting_out(),
            plays: view
                .trick
                .plays()
                .iter()
                .map(|play| WirePlay {
                    seat: play.seat,
                    card: play.card.into(),
                })
                .collect(),
            valid: view.valid.to_vec(),
            contract: view.contract,
            joker_suit: view.rules.joker_suit().get(),
        })?;
        match reply {
            ClientMessage::Play { index } => Ok(index),
            other => Err(unexpected("play", &other)),
        }
    }

    fn joker_suit(&mut self, hand: &Hand) -> Result<Suit, PlayerError> {
        let reply = self.request(TableMessage::JokerSuitRequest {
            hand: encode_hand(hand),
        })?;
        match reply {
            ClientMessage::JokerSuit { suit } => Ok(suit),
            other => Err(unexpected("joker_suit", &other)),
        }
    }
}

/// Joins the table listening at `addr` and lets `player` answer for the seat until the
/// table hangs up.
pub fn join(addr: &str, player: &mut dyn Player) -> Result<(), PlayerError> {
    let stream = TcpStream::connect(addr)?;
    stream.set_nodelay(true)?;
    serve_player(stream, player)
}

/// Relays table messages to a local player and writes back its answers. Returns once
/// the table closes the connection.
pub fn serve_player(stream: TcpStream, player: &mut dyn Player) -> Result<(), PlayerError> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    loop {
        let message: TableMessage = match read_message(&mut reader) {
            Ok(message) => message,
            Err(PlayerError::Closed) => {
                debug!(target: TARGET, "table closed the connection");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        if let Some(reply) = dispatch(player, message)? {
            write_message(&mut writer, &reply)?;
        }
    }
}

fn contract_rules(bid: Bid, joker: JokerSuit) -> Result<Rules, PlayerError> {
    if bid.is_pass() {
        return Err(PlayerError::Protocol("a pass is not a contract".to_string()));
    }
    Ok(Rules::new(bid, joker))
}

fn dispatch(
    player: &mut dyn Player,
    message: TableMessage,
) -> Result<Option<ClientMessage>, PlayerError> {
    let reply = match message {
        TableMessage::Seat { seat } => {
            player.notify_seat(seat);
            None
        }
        TableMessage::Hand { cards } => {
            player.notify_hand(&decode_hand(cards)?);
            None
        }
        TableMessage::BidMade { seat, bid } => {
            player.notify_bid(seat, bid);
            None
        }
        TableMessage::BidWinner { contractor, bid } => {
            player.notify_bid_winner(contractor, bid);
            None
        }
        TableMessage::CardPlayed { seat, card } => {
            player.notify_play(seat, card.try_into()?);
            None
        }
        TableMessage::TrickWinner { winner } => {
            player.notify_trick_winner(winner);
            None
        }
        TableMessage::Outcome { result } => {
            player.notify_hand_result(&result);
            None
        }
        TableMessage::BidRequest {
            seat,
            hand,
            current,
            history,
        } => {
            let hand = decode_hand(hand)?;
            let bid = player.bid(&BidView {
                seat,
                hand: &hand,
                current,
                history: &history,
            })?;
            Some(ClientMessage::Bid { bid })
        }
        TableMessage::DropRequest {
            seat,
            hand,
            contract,
        } => {
            let hand = decode_hand(hand)?;
            let rules = contract_rules(contract, JokerSuit::UNBOUND)?;
            let indices = player.drop3(&DropView {
                seat,
                hand: &hand,
                rules,
            })?;
            Some(ClientMessage::Drop { indices })
        }
        TableMessage::PlayRequest {
            seat,
            hand,
            leader,
            sitting_out,
            plays,
            valid,
            contract,
            joker_suit,
        } => {
            let hand = decode_hand(hand)?;
            let mut trick = Trick::with_sitting_out(leader, sitting_out);
            for play in plays {
                trick
                    .play(play.seat, play.card.try_into()?)
                    .map_err(|err| PlayerError::Protocol(err.to_string()))?;
            }
            let joker = joker_suit.map_or(JokerSuit::UNBOUND, JokerSuit::bound);
            let rules = contract_rules(contract.bid, joker)?;
            let index = player.play(&PlayView {
                seat,
                hand: &hand,
                trick: &trick,
                valid: &valid,
                rules,
                contract,
            })?;
            Some(ClientMessage::Play { index })
        }
        TableMessage::JokerSuitRequest { hand } => {
            let suit = player.joker_suit(&decode_hand(hand)?)?;
            Some(ClientMessage::JokerSuit { suit })
        }
    };
    Ok(reply)
}
