//! Translation of parser multiplicities into model multiplicities

use efdesign_core::Multiplicity;
use serde::{Deserialize, Serialize};

/// Multiplicity as written by the external parsers.
///
/// Parsers emit either the symbolic name or the integer code
/// (`0` ZeroMany, `1` One, `2` ZeroOne). Anything else is kept as
/// `Unrecognized` rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "MultiplicityCode", into = "MultiplicityCode")]
pub enum ParsedMultiplicity {
    ZeroMany,
    One,
    #[default]
    ZeroOne,
    Unrecognized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MultiplicityCode {
    Code(i64),
    Name(String),
    Other(serde_json::Value),
}

impl From<MultiplicityCode> for ParsedMultiplicity {
    fn from(code: MultiplicityCode) -> Self {
        match code {
            MultiplicityCode::Code(0) => ParsedMultiplicity::ZeroMany,
            MultiplicityCode::Code(1) => ParsedMultiplicity::One,
            MultiplicityCode::Code(2) => ParsedMultiplicity::ZeroOne,
            MultiplicityCode::Code(_) => ParsedMultiplicity::Unrecognized,
            MultiplicityCode::Name(name) => match name.as_str() {
                "ZeroMany" => ParsedMultiplicity::ZeroMany,
                "One" => ParsedMultiplicity::One,
                "ZeroOne" => ParsedMultiplicity::ZeroOne,
                _ => ParsedMultiplicity::Unrecognized,
            },
            MultiplicityCode::Other(_) => ParsedMultiplicity::Unrecognized,
        }
    }
}

impl From<ParsedMultiplicity> for MultiplicityCode {
    fn from(multiplicity: ParsedMultiplicity) -> Self {
        let name = match multiplicity {
            ParsedMultiplicity::ZeroMany => "ZeroMany",
            ParsedMultiplicity::One => "One",
            ParsedMultiplicity::ZeroOne => "ZeroOne",
            ParsedMultiplicity::Unrecognized => "Unrecognized",
        };
        MultiplicityCode::Name(name.to_string())
    }
}

/// Map a parser multiplicity to the model's.
///
/// Total: anything unrecognized becomes `ZeroOne`.
pub fn map_multiplicity(external: ParsedMultiplicity) -> Multiplicity {
    match external {
        ParsedMultiplicity::ZeroMany => Multiplicity::ZeroMany,
        ParsedMultiplicity::One => Multiplicity::One,
        ParsedMultiplicity::ZeroOne => Multiplicity::ZeroOne,
        ParsedMultiplicity::Unrecognized => Multiplicity::ZeroOne,
    }
}

impl From<ParsedMultiplicity> for Multiplicity {
    fn from(external: ParsedMultiplicity) -> Self {
        map_multiplicity(external)
    }
}
