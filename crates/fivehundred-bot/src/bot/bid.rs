use super::PARTNER_TRICKS;
use crate::player::BidView;
use fivehundred_core::bid::{Bid, MAX_TRICKS, MIN_TRICKS, SuitBid};
use fivehundred_core::model::card::Card;
use fivehundred_core::model::hand::Hand;
use fivehundred_core::model::rank::Rank;
use fivehundred_core::model::suit::Suit;

/// Picks the hand's best trump suit (or no-trumps, or misère) and bids the cheapest
/// level of it that outbids the table.
pub struct BidPlanner;

impl BidPlanner {
    pub fn choose(view: &BidView<'_>) -> Bid {
        let current = view.current.map(|record| record.bid);
        let mut candidates = Self::supported(view.hand);
        candidates.sort_by_key(|bid| bid.value());
        candidates
            .into_iter()
            .find(|bid| bid.outbids(current))
            .unwrap_or(Bid::Pass)
    }

    /// Contracts this hand could reasonably make.
    pub fn supported(hand: &Hand) -> Vec<Bid> {
        let mut bids = Vec::new();
        let (trump, suit_best) = Suit::ALL
            .into_iter()
            .map(|trump| (trump, suit_tricks(hand, trump)))
            .fold((Suit::Spades, 0), |best, candidate| {
                if candidate.1 >= best.1 { candidate } else { best }
            });
        bids.extend((MIN_TRICKS..=suit_best).map(|t| Bid::suit(t, trump)));

        let no_trumps = no_trumps_tricks(hand);
        if no_trumps >= suit_best {
            bids.extend((MIN_TRICKS..=no_trumps).map(Bid::no_trumps));
        }
        if misere_safe(hand) {
            bids.push(Bid::misere(false));
        }
        bids
    }
}

/// Half-trick count: bowers, Joker, Ace and King of trumps are sure tricks, lower trumps
/// half a trick each, off-suit Aces a trick, guarded off-suit Kings half a trick.
pub fn suit_tricks(hand: &Hand, trump: Suit) -> u8 {
    let bid = SuitBid::new(MIN_TRICKS, trump);
    let trump_block = bid.card_order(Card::new(Rank::Five, trump));
    let halves: usize = hand
        .iter()
        .map(|&card| match trump_block.iter().position(|&c| c == card) {
            Some(position) if position < 5 => 2,
            Some(_) => 1,
            None => plain_halves(hand, card),
        })
        .sum();
    cap(halves / 2 + PARTNER_TRICKS)
}

pub fn no_trumps_tricks(hand: &Hand) -> u8 {
    let halves: usize = hand
        .iter()
        .map(|&card| if card.is_joker() { 2 } else { plain_halves(hand, card) })
        .sum();
    cap(halves / 2 + PARTNER_TRICKS)
}

/// No Joker, no Aces or Kings, and nothing above a Ten.
pub fn misere_safe(hand: &Hand) -> bool {
    hand.iter()
        .all(|card| !card.is_joker() && card.rank <= Rank::Ten)
}

fn plain_halves(hand: &Hand, card: Card) -> usize {
    let Some(suit) = card.suit else {
        return 0;
    };
    match card.rank {
        Rank::Ace => 2,
        Rank::King if hand.contains(Card::new(Rank::Ace, suit)) => 1,
        _ => 0,
    }
}

fn cap(tricks: usize) -> u8 {
    tricks.min(usize::from(MAX_TRICKS)) as u8
}

#[cfg(test)]
mod tests {
    use super::{BidPlanner, misere_safe, no_trumps_tricks, suit_tricks};
    use crate::player::BidView;
    use fivehundred_core::bid::Bid;
    use fivehundred_core::game::auction::BidRecord;
    use fivehundred_core::model::card::Card;
    use fivehundred_core::model::hand::Hand;
    use fivehundred_core::model::player::Seat;
    use fivehundred_core::model::rank::Rank;
    use fivehundred_core::model::suit::Suit;

    fn strong_hearts() -> Hand {
        Hand::with_cards(vec![
            Card::JOKER,
            Card::new(Rank::Jack, Suit::Hearts),
            Card::new(Rank::Jack, Suit::Diamonds),
            Card::new(Rank::Ace, Suit::Hearts),
            Card::new(Rank::King, Suit::Hearts),
            Card::new(Rank::Seven, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::Five, Suit::Clubs),
            Card::new(Rank::Six, Suit::Clubs),
            Card::new(Rank::Eight, Suit::Spades),
        ])
    }

    fn weak() -> Hand {
        Hand::with_cards(vec![
            Card::new(Rank::Five, Suit::Spades),
            Card::new(Rank::Seven, Suit::Spades),
            Card::new(Rank::Six, Suit::Clubs),
            Card::new(Rank::Eight, Suit::Clubs),
            Card::new(Rank::Nine, Suit::Clubs),
            Card::new(Rank::Five, Suit::Diamonds),
            Card::new(Rank::Ten, Suit::Diamonds),
            Card::new(Rank::Six, Suit::Hearts),
            Card::new(Rank::Seven, Suit::Hearts),
            Card::new(Rank::Four, Suit::Hearts),
        ])
    }

    #[test]
    fn strong_trump_hand_counts_tricks() {
        let hand = strong_hearts();
        // Five sure trumps, a low trump, an off Ace: 5 + 0.5 + 1 rounded down, plus partner.
        assert_eq!(suit_tricks(&hand, Suit::Hearts), 8);
        assert_eq!(suit_tricks(&hand, Suit::Diamonds), 7);
        assert_eq!(no_trumps_tricks(&hand), 5);
        let supported = BidPlanner::supported(&hand);
        assert!(supported.iter().all(|bid| matches!(bid, Bid::Suit(s) if s.trump == Suit::Hearts)));
        assert_eq!(supported.len(), 3);
    }

    #[test]
    fn opening_bid_is_cheapest_supported() {
        let hand = strong_hearts();
        let view = BidView {
            seat: Seat::South,
            hand: &hand,
            current: None,
            history: &[],
        };
        assert_eq!(BidPlanner::choose(&view), Bid::suit(6, Suit::Hearts));
    }

    #[test]
    fn overcalls_only_within_reach() {
        let hand = strong_hearts();
        let record = BidRecord {
            seat: Seat::West,
            bid: Bid::suit(7, Suit::Hearts),
        };
        let view = BidView {
            seat: Seat::North,
            hand: &hand,
            current: Some(record),
            history: std::slice::from_ref(&record),
        };
        assert_eq!(BidPlanner::choose(&view), Bid::suit(8, Suit::Hearts));

        let record = BidRecord {
            seat: Seat::West,
            bid: Bid::suit(9, Suit::Spades),
        };
        let view = BidView {
            current: Some(record),
            ..view
        };
        assert_eq!(BidPlanner::choose(&view), Bid::Pass);
    }

    #[test]
    fn weak_hand_offers_misere() {
        let hand = weak();
        assert!(misere_safe(&hand));
        let view = BidView {
            seat: Seat::East,
            hand: &hand,
            current: None,
            history: &[],
        };
        assert_eq!(BidPlanner::choose(&view), Bid::misere(false));
        assert!(!misere_safe(&strong_hearts()));
    }
}
