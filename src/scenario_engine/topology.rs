//! Seat order for each table format.
//!
//! Preflop action runs from UTG round to the big blind; this is the only
//! ordering the engine relies on.

use std::str::FromStr;

use crate::scenario_engine::{
    error::{EngineError, Result},
    models::{Position, TableFormat},
};

const POSITIONS_6MAX: &[Position] = &[
    Position::UTG, Position::HJ, Position::CO,
    Position::BTN, Position::SB, Position::BB,
];

const POSITIONS_9MAX: &[Position] = &[
    Position::UTG, Position::UTG1, Position::UTG2,
    Position::LJ, Position::HJ, Position::CO,
    Position::BTN, Position::SB, Position::BB,
];

impl TableFormat {
    /// Seats in preflop acting order.
    pub fn seats(self) -> &'static [Position] {
        match self {
            TableFormat::SixMax  => POSITIONS_6MAX,
            TableFormat::NineMax => POSITIONS_9MAX,
        }
    }

    pub fn from_seat_count(count: usize) -> Result<Self> {
        match count {
            6 => Ok(TableFormat::SixMax),
            9 => Ok(TableFormat::NineMax),
            n => Err(EngineError::UnknownFormat(format!("{n} seats"))),
        }
    }

    pub fn contains(self, seat: Position) -> bool {
        self.seats().contains(&seat)
    }

    pub fn index_of(self, seat: Position) -> Result<usize> {
        self.seats()
            .iter()
            .position(|&s| s == seat)
            .ok_or(EngineError::SeatNotInFormat { seat, format: self })
    }

    /// The seat acting right after `seat`, or `None` for the big blind.
    pub fn next_seat(self, seat: Position) -> Result<Option<Position>> {
        let index = self.index_of(seat)?;
        Ok(self.seats().get(index + 1).copied())
    }

    pub fn last_seat(self) -> Position {
        Position::BB
    }
}

impl FromStr for TableFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "6" | "6max" | "6-max" => Ok(TableFormat::SixMax),
            "9" | "9max" | "9-max" => Ok(TableFormat::NineMax),
            _ => Err(EngineError::UnknownFormat(s.to_string())),
        }
    }
}
