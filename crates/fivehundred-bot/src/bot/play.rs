use super::card_strength;
use crate::player::PlayView;
use fivehundred_core::model::card::Card;
use std::cmp::Reverse;

/// Picks a card from the legal set.
///
/// Ordinary contracts: lead the strongest card; when following, leave a trick the
/// partner already holds, otherwise take it as cheaply as possible or throw the weakest
/// card. A misère contractor ducks with the highest card that still loses.
pub struct PlayPlanner;

impl PlayPlanner {
    pub fn choose(view: &PlayView<'_>) -> Option<usize> {
        let candidates: Vec<(usize, Card)> = view
            .valid
            .iter()
            .filter_map(|&index| view.hand.get(index).map(|card| (index, card)))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let ducking = view.contract.bid.is_misere() && view.contract.contractor == view.seat;
        let choice = if ducking {
            Self::duck(view, &candidates)
        } else if view.trick.is_empty() {
            Self::strongest(view, candidates.iter().copied())
        } else {
            Self::follow(view, &candidates)
        };
        choice.map(|(index, _)| index)
    }

    fn follow(view: &PlayView<'_>, candidates: &[(usize, Card)]) -> Option<(usize, Card)> {
        let holder = view.trick.winner(&view.rules);
        if holder.is_some_and(|seat| seat != view.seat && seat.same_team(view.seat)) {
            return Self::weakest(view, candidates.iter().copied());
        }

        let winning = candidates
            .iter()
            .copied()
            .filter(|&(_, card)| Self::wins_with(view, card));
        Self::weakest(view, winning).or_else(|| Self::weakest(view, candidates.iter().copied()))
    }

    fn duck(view: &PlayView<'_>, candidates: &[(usize, Card)]) -> Option<(usize, Card)> {
        if view.trick.is_empty() {
            return Self::weakest(view, candidates.iter().copied());
        }
        let losing = candidates
            .iter()
            .copied()
            .filter(|&(_, card)| !Self::wins_with(view, card));
        Self::strongest(view, losing).or_else(|| Self::weakest(view, candidates.iter().copied()))
    }

    fn wins_with(view: &PlayView<'_>, card: Card) -> bool {
        let mut probe = view.trick.clone();
        probe.play(view.seat, card).is_ok() && probe.winner(&view.rules) == Some(view.seat)
    }

    fn strongest(
        view: &PlayView<'_>,
        cards: impl Iterator<Item = (usize, Card)>,
    ) -> Option<(usize, Card)> {
        cards.max_by_key(|&(index, card)| (card_strength(&view.rules, card), Reverse(index)))
    }

    fn weakest(
        view: &PlayView<'_>,
        cards: impl Iterator<Item = (usize, Card)>,
    ) -> Option<(usize, Card)> {
        cards.min_by_key(|&(index, card)| (card_strength(&view.rules, card), index))
    }
}
