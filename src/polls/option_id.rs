//! Option Identifiers
//!
//! Select-menu custom ids are `polls_<pollId>` and option values are
//! `polls_<pollId>_<choiceIndex>`. The poll id never contains `_`, so an
//! option value always splits into exactly three parts.

use super::error::PollError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed prefix of every poll component identifier
pub const PREFIX: &str = "polls";

const DELIMITER: char = '_';

/// Poll correlation key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PollId(Uuid);

impl PollId {
    /// Issue a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PollId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PollId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for PollId {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(DELIMITER) {
            return Err(PollError::InvalidOptionId(s.to_string()));
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| PollError::InvalidOptionId(s.to_string()))
    }
}

/// Custom id of a poll's select menu
pub fn menu_id(poll_id: PollId) -> String {
    format!("{PREFIX}{DELIMITER}{poll_id}")
}

/// Value of one select option
pub fn encode(poll_id: PollId, index: usize) -> String {
    format!("{PREFIX}{DELIMITER}{poll_id}{DELIMITER}{index}")
}

/// Split an option value back into poll id and choice index
pub fn parse(value: &str) -> Result<(PollId, usize), PollError> {
    let invalid = || PollError::InvalidOptionId(value.to_string());

    let parts: Vec<&str> = value.split(DELIMITER).collect();
    let [prefix, id, index] = parts.as_slice() else {
        return Err(invalid());
    };
    if *prefix != PREFIX {
        return Err(invalid());
    }

    let poll_id = id.parse::<PollId>().map_err(|_| invalid())?;
    let index = index.parse::<usize>().map_err(|_| invalid())?;
    Ok((poll_id, index))
}
