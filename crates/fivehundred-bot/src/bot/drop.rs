use super::card_strength;
use crate::player::DropView;
use fivehundred_core::model::deck::KITTY_SIZE;

/// Throws away the weakest cards, or the strongest when the contract is misère.
pub struct DropPlanner;

impl DropPlanner {
    pub fn choose(view: &DropView<'_>) -> Vec<usize> {
        let mut ranked: Vec<(usize, usize)> = view
            .hand
            .iter()
            .enumerate()
            .map(|(index, &card)| (index, card_strength(&view.rules, card)))
            .collect();
        ranked.sort_by_key(|&(index, strength)| (strength, index));
        if view.rules.bid().is_misere() {
            ranked.reverse();
        }

        let mut chosen: Vec<usize> = ranked
            .into_iter()
            .take(KITTY_SIZE)
            .map(|(index, _)| index)
            .collect();
        chosen.sort_unstable();
        chosen
    }
}
