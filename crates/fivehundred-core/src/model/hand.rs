use crate::model::card::Card;
use serde::{Deserialize, Serialize};
use std::vec::Vec;

/// Cards held by one seat. Order is display order and is owned by the rules in force,
/// so callers re-sort after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Card> {
        (index < self.cards.len()).then(|| self.cards.remove(index))
    }

    /// Removes every listed index, returning the removed cards in hand order.
    /// Out-of-range indices are ignored.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Card> {
        let mut kept = Vec::with_capacity(self.cards.len());
        let mut removed = Vec::with_capacity(indices.len());
        for (index, card) in self.cards.drain(..).enumerate() {
            if indices.contains(&index) {
                removed.push(card);
            } else {
                kept.push(card);
            }
        }
        self.cards = kept;
        removed
    }

    pub fn position(&self, card: Card) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn sort_by_key<K, F>(&mut self, key: F)
    where
        K: Ord,
        F: FnMut(&Card) -> K,
    {
        self.cards.sort_by_key(key);
    }
}
