use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades = 0,
    Clubs = 1,
    Diamonds = 2,
    Hearts = 3,
}

impl Suit {
    /// Suits in bidding order, cheapest first.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Spades),
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Diamonds),
            3 => Some(Suit::Hearts),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }

    /// The other suit of the same colour (home of the left bower).
    pub const fn same_colour(self) -> Suit {
        match self {
            Suit::Spades => Suit::Clubs,
            Suit::Clubs => Suit::Spades,
            Suit::Diamonds => Suit::Hearts,
            Suit::Hearts => Suit::Diamonds,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
        }
    }

    pub fn from_letter(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "s" | "spades" => Some(Suit::Spades),
            "c" | "clubs" => Some(Suit::Clubs),
            "d" | "diamonds" => Some(Suit::Diamonds),
            "h" | "hearts" => Some(Suit::Hearts),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn colour_pairs_are_symmetric() {
        for suit in Suit::ALL {
            assert_eq!(suit.same_colour().same_colour(), suit);
            assert_eq!(suit.same_colour().is_red(), suit.is_red());
        }
        assert_eq!(Suit::Hearts.same_colour(), Suit::Diamonds);
        assert_eq!(Suit::Spades.same_colour(), Suit::Clubs);
    }

    #[test]
    fn from_letter_accepts_short_and_long_names() {
        assert_eq!(Suit::from_letter("h"), Some(Suit::Hearts));
        assert_eq!(Suit::from_letter(" Clubs "), Some(Suit::Clubs));
        assert_eq!(Suit::from_letter("x"), None);
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Diamonds));
        assert_eq!(Suit::from_index(4), None);
    }
}
