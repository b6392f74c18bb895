//! Contract rules: suit resolution, trick ranking, legal plays, hand ordering and
//! bid values for every 500 contract.

mod misere;
mod no_trumps;
mod suit;

pub use misere::MisereBid;
pub use no_trumps::NoTrumpsBid;
pub use suit::SuitBid;

use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_TRICKS: u8 = 6;
pub const MAX_TRICKS: u8 = 10;

/// A call made during the auction. Every variant except `Pass` is a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bid {
    Suit(SuitBid),
    NoTrumps(NoTrumpsBid),
    Misere(MisereBid),
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("{tricks} tricks is outside the biddable range 6-10")]
    TricksOutOfRange { tricks: u8 },
}

impl Bid {
    pub const fn suit(tricks: u8, trump: Suit) -> Self {
        Bid::Suit(SuitBid::new(tricks, trump))
    }

    pub const fn no_trumps(tricks: u8) -> Self {
        Bid::NoTrumps(NoTrumpsBid::new(tricks))
    }

    pub const fn misere(open: bool) -> Self {
        Bid::Misere(MisereBid::new(open))
    }

    pub const fn is_pass(self) -> bool {
        matches!(self, Bid::Pass)
    }

    pub const fn is_misere(self) -> bool {
        matches!(self, Bid::Misere(_))
    }

    /// Whether a Joker lead asks the leader to call a suit for it.
    pub const fn calls_joker_suit(self) -> bool {
        matches!(self, Bid::NoTrumps(_) | Bid::Misere(_))
    }

    pub fn validate(self) -> Result<(), BidError> {
        let tricks = match self {
            Bid::Suit(bid) => bid.tricks,
            Bid::NoTrumps(bid) => bid.tricks,
            Bid::Misere(_) | Bid::Pass => return Ok(()),
        };
        if (MIN_TRICKS..=MAX_TRICKS).contains(&tricks) {
            Ok(())
        } else {
            Err(BidError::TricksOutOfRange { tricks })
        }
    }

    /// Auction value.
    ///
    /// # Panics
    ///
    /// A pass has no value; comparing one is an orchestration bug.
    pub fn value(self) -> i32 {
        match self {
            Bid::Suit(bid) => bid.value(),
            Bid::NoTrumps(bid) => bid.value(),
            Bid::Misere(bid) => bid.value(),
            Bid::Pass => panic!("a pass has no bid value"),
        }
    }

    /// True when `self` may replace `current` as the winning bid.
    pub fn outbids(self, current: Option<Bid>) -> bool {
        if self.is_pass() {
            return false;
        }
        current.is_none_or(|current| self.value() > current.value())
    }

    pub fn rules(self) -> Rules {
        Rules::new(self, JokerSuit::UNBOUND)
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bid::Suit(bid) => fmt::Display::fmt(bid, f),
            Bid::NoTrumps(bid) => fmt::Display::fmt(bid, f),
            Bid::Misere(bid) => fmt::Display::fmt(bid, f),
            Bid::Pass => f.write_str("Pass"),
        }
    }
}

/// Suit called for the Joker when it is led in no-trumps or misère. Bound at most once
/// per hand; owned by the hand in progress rather than by the bid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JokerSuit(Option<Suit>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("joker suit already called as {0}")]
pub struct JokerAlreadyBound(pub Suit);

impl JokerSuit {
    pub const UNBOUND: JokerSuit = JokerSuit(None);

    pub const fn bound(suit: Suit) -> Self {
        JokerSuit(Some(suit))
    }

    pub const fn get(self) -> Option<Suit> {
        self.0
    }

    pub const fn is_bound(self) -> bool {
        self.0.is_some()
    }

    pub fn bind(&mut self, suit: Suit) -> Result<(), JokerAlreadyBound> {
        match self.0 {
            Some(existing) => Err(JokerAlreadyBound(existing)),
            None => {
                self.0 = Some(suit);
                Ok(())
            }
        }
    }
}

/// Rules in force for one hand: the contract plus the current joker binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    bid: Bid,
    joker: JokerSuit,
}

impl Rules {
    /// # Panics
    ///
    /// A pass is not a contract and has no rules.
    pub fn new(bid: Bid, joker: JokerSuit) -> Self {
        assert!(!bid.is_pass(), "rules requested for a pass");
        Self { bid, joker }
    }

    pub fn bid(&self) -> Bid {
        self.bid
    }

    pub fn joker_suit(&self) -> JokerSuit {
        self.joker
    }

    pub fn value(&self) -> i32 {
        self.bid.value()
    }

    pub fn effective_suit(&self, card: Card) -> Option<Suit> {
        match self.bid {
            Bid::Suit(bid) => bid.effective_suit(card),
            Bid::NoTrumps(bid) => bid.effective_suit(card, self.joker),
            Bid::Misere(bid) => bid.effective_suit(card, self.joker),
            Bid::Pass => unreachable!("rules are never built for a pass"),
        }
    }

    /// Every card that can win a trick led by `lead`, highest first.
    pub fn card_order(&self, lead: Card) -> Vec<Card> {
        match self.bid {
            Bid::Suit(bid) => bid.card_order(lead),
            Bid::NoTrumps(bid) => bid.card_order(lead, self.joker),
            Bid::Misere(bid) => bid.card_order(lead, self.joker),
            Bid::Pass => unreachable!("rules are never built for a pass"),
        }
    }

    /// Indices into `hand` that may be played on `trick`, ascending.
    pub fn valid_plays(&self, trick: &Trick, hand: &Hand) -> Vec<usize> {
        match self.bid {
            Bid::Suit(bid) => bid.valid_plays(trick, hand),
            Bid::NoTrumps(bid) => bid.valid_plays(trick, hand, self.joker),
            Bid::Misere(bid) => bid.valid_plays(trick, hand, self.joker),
            Bid::Pass => unreachable!("rules are never built for a pass"),
        }
    }

    pub fn sort_hand(&self, hand: &mut Hand) {
        match self.bid {
            Bid::Suit(bid) => bid.sort_hand(hand),
            Bid::NoTrumps(bid) => bid.sort_hand(hand),
            Bid::Misere(bid) => bid.sort_hand(hand),
            Bid::Pass => unreachable!("rules are never built for a pass"),
        }
    }

    pub fn won(&self, tricks_won: usize) -> bool {
        match self.bid {
            Bid::Suit(bid) => bid.won(tricks_won),
            Bid::NoTrumps(bid) => bid.won(tricks_won),
            Bid::Misere(bid) => bid.won(tricks_won),
            Bid::Pass => unreachable!("rules are never built for a pass"),
        }
    }
}

/// Order used before a contract exists (deal and auction).
pub fn sort_unbid(hand: &mut Hand) {
    NoTrumpsBid::default().sort_hand(hand);
}

/// A, K, Q, [J], 10 .. 5 of `suit`, then the 4 when the deck has one.
fn plain_run(suit: Suit, with_jack: bool) -> impl Iterator<Item = Card> {
    const RUN: [Rank; 10] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
    ];
    let four = Card::new(Rank::Four, suit);
    RUN.into_iter()
        .filter(move |&rank| with_jack || rank != Rank::Jack)
        .map(move |rank| Card::new(rank, suit))
        .chain(Deck::includes(four).then_some(four))
}

/// Must follow the lead's effective suit when able; `always_legal` cards are exempt.
fn follow_suit<S, A>(trick: &Trick, hand: &Hand, suit_of: S, always_legal: A) -> Vec<usize>
where
    S: Fn(Card) -> Option<Suit>,
    A: Fn(Card) -> bool,
{
    let Some(lead) = trick.lead_card() else {
        return (0..hand.len()).collect();
    };
    let lead_suit = suit_of(lead);
    let can_follow = hand.iter().any(|&card| suit_of(card) == lead_suit);

    hand.iter()
        .enumerate()
        .filter(|&(_, &card)| !can_follow || always_legal(card) || suit_of(card) == lead_suit)
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Bid, BidError, JokerAlreadyBound, JokerSuit, Rules};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::player::Seat;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn contracts() -> Vec<Bid> {
        let mut bids: Vec<Bid> = Suit::ALL.iter().map(|&s| Bid::suit(6, s)).collect();
        bids.push(Bid::no_trumps(8));
        bids.push(Bid::misere(false));
        bids.push(Bid::misere(true));
        bids
    }

    #[test]
    fn trump_block_length_depends_on_red_four() {
        for trump in Suit::ALL {
            let rules = Bid::suit(6, trump).rules();
            let order = rules.card_order(Card::new(Rank::Nine, trump));
            let expected = if trump.is_red() { 13 } else { 12 };
            assert_eq!(order.len(), expected, "trump {trump}");

            for lead in Suit::ALL.iter().copied().filter(|&s| s != trump) {
                let lead_card = Card::new(Rank::Nine, lead);
                let order = rules.card_order(lead_card);
                let extra = order.len() - expected;
                assert!(extra == 10 || extra == 11, "trump {trump} lead {lead}: {extra}");
            }
        }
    }

    #[test]
    fn ordered_cards_are_trump_or_lead_suit() {
        for trump in Suit::ALL {
            let rules = Bid::suit(7, trump).rules();
            for card in Deck::five_hundred().cards().iter().copied() {
                let lead_suit = rules.effective_suit(card);
                for ranked in rules.card_order(card) {
                    let suit = rules.effective_suit(ranked);
                    assert!(
                        suit == Some(trump) || suit == lead_suit,
                        "{ranked} in order for lead {card} under {trump}"
                    );
                    assert!(Deck::includes(ranked));
                }
            }
        }
    }

    #[test]
    fn valid_plays_never_empty_for_dealt_hands() {
        let mut rng = StdRng::seed_from_u64(500);
        for bid in contracts() {
            let rules = bid.rules();
            for _ in 0..50 {
                let deck = Deck::shuffled(&mut rng);
                let deal = deck.deal();
                let mut trick = Trick::new(Seat::South);
                trick.play(Seat::South, deal.hands[0][0]).unwrap();
                for cards in &deal.hands[1..] {
                    let hand = Hand::with_cards(cards.clone());
                    assert!(!rules.valid_plays(&trick, &hand).is_empty());
                }
            }
        }
    }

    #[test]
    fn must_follow_with_left_bower_as_trump() {
        let rules = Bid::suit(6, Suit::Hearts).rules();
        let mut trick = Trick::new(Seat::West);
        trick
            .play(Seat::West, Card::new(Rank::Ace, Suit::Hearts))
            .unwrap();
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Diamonds),
            Card::new(Rank::Nine, Suit::Spades),
        ]);
        assert_eq!(rules.effective_suit(hand.cards()[0]), Some(Suit::Hearts));
        assert_eq!(rules.effective_suit(hand.cards()[1]), Some(Suit::Spades));
        assert_eq!(rules.valid_plays(&trick, &hand), vec![0]);
    }

    #[test]
    fn left_bower_cannot_follow_its_printed_suit() {
        let rules = Bid::suit(6, Suit::Hearts).rules();
        let mut trick = Trick::new(Seat::West);
        trick
            .play(Seat::West, Card::new(Rank::King, Suit::Diamonds))
            .unwrap();
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Diamonds),
            Card::new(Rank::Five, Suit::Diamonds),
            Card::new(Rank::Nine, Suit::Spades),
        ]);
        assert_eq!(rules.valid_plays(&trick, &hand), vec![1]);
    }

    #[test]
    fn empty_trick_allows_any_lead() {
        let rules = Bid::no_trumps(6).rules();
        let trick = Trick::new(Seat::North);
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Five, Suit::Clubs),
            Card::JOKER,
            Card::new(Rank::Ace, Suit::Hearts),
        ]);
        assert_eq!(rules.valid_plays(&trick, &hand), vec![0, 1, 2]);
    }

    #[test]
    fn sort_hand_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(9);
        for bid in contracts() {
            let rules = bid.rules();
            for _ in 0..20 {
                let mut cards = Deck::five_hundred().cards().to_vec();
                cards.shuffle(&mut rng);
                cards.truncate(13);
                let mut hand = Hand::with_cards(cards);
                rules.sort_hand(&mut hand);
                let once = hand.clone();
                rules.sort_hand(&mut hand);
                assert_eq!(once, hand, "{bid}");
            }
        }
    }

    #[test]
    fn outbidding_requires_strictly_higher_value() {
        assert!(Bid::suit(6, Suit::Spades).outbids(None));
        assert!(Bid::suit(6, Suit::Clubs).outbids(Some(Bid::suit(6, Suit::Spades))));
        assert!(!Bid::suit(6, Suit::Spades).outbids(Some(Bid::suit(6, Suit::Spades))));
        assert!(Bid::misere(false).outbids(Some(Bid::suit(7, Suit::Spades))));
        assert!(!Bid::misere(false).outbids(Some(Bid::suit(7, Suit::Diamonds))));
        assert!(!Bid::Pass.outbids(None));
        assert_eq!(Bid::no_trumps(6).value(), 120);
        assert_eq!(Bid::no_trumps(10).value(), 520);
    }

    #[test]
    fn validate_checks_trick_range() {
        assert!(Bid::suit(10, Suit::Hearts).validate().is_ok());
        assert_eq!(
            Bid::no_trumps(5).validate(),
            Err(BidError::TricksOutOfRange { tricks: 5 })
        );
        assert!(Bid::misere(true).validate().is_ok());
    }

    #[test]
    fn joker_binds_once() {
        let mut joker = JokerSuit::default();
        assert!(!joker.is_bound());
        joker.bind(Suit::Diamonds).unwrap();
        assert_eq!(joker.get(), Some(Suit::Diamonds));
        assert_eq!(joker.bind(Suit::Spades), Err(JokerAlreadyBound(Suit::Diamonds)));
    }

    #[test]
    fn misere_uses_no_trump_rules() {
        let misere = Rules::new(Bid::misere(false), JokerSuit::bound(Suit::Clubs));
        let no_trumps = Rules::new(Bid::no_trumps(6), JokerSuit::bound(Suit::Clubs));
        for card in Deck::five_hundred().cards().iter().copied() {
            assert_eq!(misere.effective_suit(card), no_trumps.effective_suit(card));
            assert_eq!(misere.card_order(card), no_trumps.card_order(card));
        }
        assert!(misere.won(0));
        assert!(!misere.won(1));
    }

    #[test]
    #[should_panic(expected = "rules requested for a pass")]
    fn pass_has_no_rules() {
        let _ = Bid::Pass.rules();
    }

    #[test]
    #[should_panic(expected = "a pass has no bid value")]
    fn pass_has_no_value() {
        let _ = Bid::Pass.value();
    }

    #[test]
    fn bids_display_compactly() {
        assert_eq!(Bid::suit(7, Suit::Hearts).to_string(), "7♥");
        assert_eq!(Bid::no_trumps(8).to_string(), "8NT");
        assert_eq!(Bid::misere(false).to_string(), "Misère");
        assert_eq!(Bid::Pass.to_string(), "Pass");
    }
}
