//! Tunable search parameters.
//!
//! The external names (`PIECE`, `FREEDOM`, `END_GAME`, `DEPTH`) are only
//! resolved when a parameter is set; a search reads plain struct fields.

use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_DEPTH, DEFAULT_END_GAME, DEFAULT_FREEDOM, DEFAULT_PIECE, Eval};
use crate::error::ParameterError;

/// Weights and depth used by one search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchParameters {
    /// Weight per stone of material advantage
    pub piece: Eval,
    /// Weight per free adjacent node of mobility advantage
    pub freedom: Eval,
    /// Multiplier applied to a decided game
    pub end_game: Eval,
    /// Plies to search
    pub depth: u32,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            piece: DEFAULT_PIECE,
            freedom: DEFAULT_FREEDOM,
            end_game: DEFAULT_END_GAME,
            depth: DEFAULT_DEPTH,
        }
    }
}

impl SearchParameters {
    /// Set one parameter by name.
    ///
    /// Weights accept any `i32`; the depth must be non-negative.
    pub fn set(&mut self, parameter: Parameter, value: i64) -> Result<(), ParameterError> {
        let invalid = || ParameterError::InvalidValue {
            name: parameter.name(),
            value,
        };

        match parameter {
            Parameter::Depth => {
                self.depth = u32::try_from(value).map_err(|_| invalid())?;
            }
            Parameter::Piece | Parameter::Freedom | Parameter::EndGame => {
                let value = Eval::try_from(value).map_err(|_| invalid())?;
                match parameter {
                    Parameter::Piece => self.piece = value,
                    Parameter::Freedom => self.freedom = value,
                    _ => self.end_game = value,
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, parameter: Parameter) -> i64 {
        match parameter {
            Parameter::Piece => self.piece.into(),
            Parameter::Freedom => self.freedom.into(),
            Parameter::EndGame => self.end_game.into(),
            Parameter::Depth => self.depth.into(),
        }
    }
}

impl fmt::Display for SearchParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = Parameter::ALL
            .iter()
            .map(|&p| format!("{}={}", p.name(), self.get(p)))
            .collect();
        write!(f, "{}", pairs.join(" "))
    }
}

/// Name of a tunable parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    Piece,
    Freedom,
    EndGame,
    Depth,
}

impl Parameter {
    pub const ALL: [Parameter; 4] = [
        Parameter::Piece,
        Parameter::Freedom,
        Parameter::EndGame,
        Parameter::Depth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Piece => "PIECE",
            Parameter::Freedom => "FREEDOM",
            Parameter::EndGame => "END_GAME",
            Parameter::Depth => "DEPTH",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive lookup of the external name.
impl FromStr for Parameter {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParameterError::UnknownName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SearchParameters::default();
        assert_eq!(params.piece, 7);
        assert_eq!(params.freedom, 1);
        assert_eq!(params.end_game, i32::MAX);
        assert_eq!(params.depth, 5);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("PIECE".parse::<Parameter>(), Ok(Parameter::Piece));
        assert_eq!("end_game".parse::<Parameter>(), Ok(Parameter::EndGame));
        assert_eq!("Depth".parse::<Parameter>(), Ok(Parameter::Depth));
        assert_eq!(
            "SPEED".parse::<Parameter>(),
            Err(ParameterError::UnknownName("SPEED".to_string()))
        );
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut params = SearchParameters::default();
        params.set(Parameter::Freedom, 3).unwrap();
        params.set(Parameter::Freedom, 3).unwrap();
        assert_eq!(params.freedom, 3);
        assert_eq!(params.get(Parameter::Freedom), 3);
        params.set(Parameter::Piece, -4).unwrap();
        assert_eq!(params.piece, -4);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut params = SearchParameters::default();
        assert_eq!(
            params.set(Parameter::Depth, -1),
            Err(ParameterError::InvalidValue {
                name: "DEPTH",
                value: -1
            })
        );
        assert!(params.set(Parameter::Piece, i64::from(i32::MAX) + 1).is_err());
        assert_eq!(params, SearchParameters::default());
    }

    #[test]
    fn test_display() {
        let params = SearchParameters::default();
        assert_eq!(
            params.to_string(),
            format!("PIECE=7 FREEDOM=1 END_GAME={} DEPTH=5", i32::MAX)
        );
    }
}
