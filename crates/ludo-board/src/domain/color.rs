//! Player colors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four token colors. A seat owns exactly one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// First seat.
    Red,
    /// Second seat.
    Green,
    /// Third seat.
    Blue,
    /// Fourth seat.
    Yellow,
}

impl Color {
    /// All colors in seating order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    /// Color for a seat index in join order, if the index is a valid seat.
    #[must_use]
    pub fn for_seat(seat: usize) -> Option<Self> {
        Self::ALL.get(seat).copied()
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Yellow => 3,
        }
    }

    /// Lowercase name, as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
