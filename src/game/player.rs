use serde::{Deserialize, Serialize};

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    PlayerA,
    PlayerB,
}

/// One of the two competing sides. `PlayerA` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    PlayerA,
    PlayerB,
}

impl Side {
    /// Get the other side
    pub fn other(self) -> Side {
        match self {
            Side::PlayerA => Side::PlayerB,
            Side::PlayerB => Side::PlayerA,
        }
    }

    /// Convert side to the cell value its discs occupy
    pub fn to_cell(self) -> Cell {
        match self {
            Side::PlayerA => Cell::PlayerA,
            Side::PlayerB => Cell::PlayerB,
        }
    }

    /// Disc colour name for display
    pub fn name(self) -> &'static str {
        match self {
            Side::PlayerA => "Red",
            Side::PlayerB => "Yellow",
        }
    }
}

impl Cell {
    /// The side owning this cell, if any
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::PlayerA => Some(Side::PlayerA),
            Cell::PlayerB => Some(Side::PlayerB),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_side() {
        assert_eq!(Side::PlayerA.other(), Side::PlayerB);
        assert_eq!(Side::PlayerB.other(), Side::PlayerA);
    }

    #[test]
    fn test_side_name() {
        assert_eq!(Side::PlayerA.name(), "Red");
        assert_eq!(Side::PlayerB.name(), "Yellow");
    }

    #[test]
    fn test_cell_side_roundtrip() {
        assert_eq!(Side::PlayerA.to_cell().side(), Some(Side::PlayerA));
        assert_eq!(Side::PlayerB.to_cell().side(), Some(Side::PlayerB));
        assert_eq!(Cell::Empty.side(), None);
    }
}
