//! Gas names: formatting and parsing.
//!
//! # Supported names
//!
//! - `Air`, `Oxygen`
//! - Nitrox: `EAN32`, `Nitrox 32`
//! - Trimix: `Trimix 18/45`, `Helitrox 21/35`, or the bare `18/45`
//!
//! Matching is case insensitive.

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{preceded, separated_pair, terminated},
    IResult, Parser,
};

use super::Gas;
use crate::error::GasError;

pub const AIR_NAME: &str = "Air";
pub const OXYGEN_NAME: &str = "Oxygen";

/// Rounded percent of oxygen in air, used to tell Trimix from Helitrox.
const SIMPLE_O2_IN_AIR: u32 = 21;

static STANDARD_GASES: [(&str, Gas); 13] = [
    // nitrox
    (AIR_NAME, Gas::AIR),
    ("EAN32", Gas::from_permille(320, 0)),
    ("EAN36", Gas::from_permille(360, 0)),
    ("EAN38", Gas::from_permille(380, 0)),
    ("EAN50", Gas::from_permille(500, 0)),
    (OXYGEN_NAME, Gas::OXYGEN),
    // normoxic and hyperoxic trimix
    ("Helitrox 35/25", Gas::from_permille(350, 250)),
    ("Helitrox 25/25", Gas::from_permille(250, 250)),
    ("Helitrox 21/35", Gas::from_permille(210, 350)),
    ("Trimix 18/45", Gas::from_permille(180, 450)),
    // hypoxic
    ("Trimix 15/55", Gas::from_permille(150, 550)),
    ("Trimix 12/60", Gas::from_permille(120, 600)),
    ("Trimix 10/70", Gas::from_permille(100, 700)),
];

/// Predefined gases with their display names.
pub fn standard_gases() -> &'static [(&'static str, Gas)] {
    &STANDARD_GASES
}

pub fn standard_names() -> Vec<&'static str> {
    STANDARD_GASES.iter().map(|(name, _)| *name).collect()
}

/// Names of predefined gases without helium.
pub fn nitrox_names() -> Vec<&'static str> {
    STANDARD_GASES
        .iter()
        .filter(|(_, gas)| gas.he == 0)
        .map(|(name, _)| *name)
        .collect()
}

/// Display name of the gas, e.g. `EAN32` or `Trimix 18/45`.
pub fn name_for(gas: &Gas) -> String {
    let percent_o2 = (gas.o2() * 100.0).round() as u32;
    let percent_he = (gas.he() * 100.0).round() as u32;

    if percent_he == 0 {
        if percent_o2 >= 100 {
            return OXYGEN_NAME.to_string();
        }

        if percent_o2 == SIMPLE_O2_IN_AIR {
            return AIR_NAME.to_string();
        }

        return format!("EAN{percent_o2}");
    }

    let prefix = if percent_o2 >= SIMPLE_O2_IN_AIR {
        "Helitrox"
    } else {
        "Trimix"
    };
    format!("{prefix} {percent_o2}/{percent_he}")
}

/// Looks up a gas by name, `None` if the name isn't recognized.
pub fn by_name(name: &str) -> Option<Gas> {
    parse(name).ok()
}

/// Parse a gas name into a gas.
pub fn parse(input: &str) -> Result<Gas, GasError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GasError::ParseError {
            position: 0,
            message: "empty gas name".to_string(),
        });
    }

    match all_consuming(parse_gas).parse(input) {
        Ok((_, ParsedGas::Named(gas))) => Ok(gas),
        Ok((_, ParsedGas::Mix { o2, he })) => Gas::from_percent(o2, he),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            if e.input.len() == input.len() {
                return Err(GasError::UnknownGas(input.to_string()));
            }

            Err(GasError::ParseError {
                position: input.len() - e.input.len(),
                message: format!("unexpected characters: '{}'", e.input),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(GasError::ParseError {
            position: input.len(),
            message: "incomplete gas name".to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParsedGas {
    Named(Gas),
    Mix { o2: u8, he: u8 },
}

fn parse_gas(input: &str) -> IResult<&str, ParsedGas> {
    alt((parse_named, parse_nitrox, parse_mix)).parse(input)
}

fn parse_named(input: &str) -> IResult<&str, ParsedGas> {
    alt((
        value(ParsedGas::Named(Gas::AIR), tag_no_case("air")),
        value(ParsedGas::Named(Gas::OXYGEN), tag_no_case("oxygen")),
    ))
    .parse(input)
}

fn parse_nitrox(input: &str) -> IResult<&str, ParsedGas> {
    let prefix = alt((
        tag_no_case("ean"),
        terminated(tag_no_case("nitrox"), multispace0),
    ));
    map(preceded(prefix, parse_percent), |o2| ParsedGas::Mix {
        o2,
        he: 0,
    })
    .parse(input)
}

fn parse_mix(input: &str) -> IResult<&str, ParsedGas> {
    let prefix = opt(terminated(
        alt((tag_no_case("trimix"), tag_no_case("helitrox"))),
        multispace0,
    ));
    map(
        preceded(prefix, separated_pair(parse_percent, char('/'), parse_percent)),
        |(o2, he)| ParsedGas::Mix { o2, he },
    )
    .parse(input)
}

fn parse_percent(input: &str) -> IResult<&str, u8> {
    map_res(digit1, |digits: &str| digits.parse::<u8>()).parse(input)
}
