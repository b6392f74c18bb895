use core::fmt;
use serde::{Deserialize, Serialize};

/// A seat at the table. Seats 0/2 and 1/3 are partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    South = 0,
    West = 1,
    North = 2,
    East = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::South, Seat::West, Seat::North, Seat::East];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::South),
            1 => Some(Seat::West),
            2 => Some(Seat::North),
            3 => Some(Seat::East),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Seat {
        match self {
            Seat::South => Seat::West,
            Seat::West => Seat::North,
            Seat::North => Seat::East,
            Seat::East => Seat::South,
        }
    }

    pub const fn partner(self) -> Seat {
        match self {
            Seat::South => Seat::North,
            Seat::West => Seat::East,
            Seat::North => Seat::South,
            Seat::East => Seat::West,
        }
    }

    pub fn same_team(self, other: Seat) -> bool {
        self == other || self.partner() == other
    }

    /// Seats in play order starting from `self`.
    pub fn rotation(self) -> impl Iterator<Item = Seat> {
        let mut seat = self;
        (0..4).map(move |_| {
            let current = seat;
            seat = seat.next();
            current
        })
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::South => "South",
            Seat::West => "West",
            Seat::North => "North",
            Seat::East => "East",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::Seat;

    #[test]
    fn next_wraps_around() {
        assert_eq!(Seat::East.next(), Seat::South);
    }

    #[test]
    fn partner_is_two_seats_away() {
        for seat in Seat::LOOP {
            assert_eq!(seat.partner(), seat.next().next());
            assert!(seat.same_team(seat.partner()));
            assert!(!seat.same_team(seat.next()));
        }
    }

    #[test]
    fn rotation_starts_at_self() {
        let order: Vec<_> = Seat::North.rotation().collect();
        assert_eq!(order, vec![Seat::North, Seat::East, Seat::South, Seat::West]);
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
    }
}
