//! Asset serial allocator
//!
//! Virtual machine names carry an asset tag whose trailing four digits are a
//! serial number. The ledger maps every serial seen in the inventory to the
//! name that holds it. New serials are only issued above the highest one in
//! use; gaps below that watermark are never offered.

use crate::error::InvalidGrammarError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tag grammar used when none is configured
pub const DEFAULT_TAG_PATTERN: &str = r"^[A-Z]{2}\d{2,3}[A-Z]{3,5}(\d{4})$";

/// Highest serial a four-digit tag can carry
pub const MAX_SERIAL: u16 = 9999;

/// Number of issuable serials, `0001` through `9999`
pub const TOTAL_SERIALS: usize = MAX_SERIAL as usize;

/// How far past the watermark [`list_view`] reaches by default
pub const DEFAULT_LIST_WINDOW: u16 = 1000;

/// A four-digit serial, `0000`..=`9999`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Serial(u16);

impl Serial {
    /// Wrap a number, `None` above [`MAX_SERIAL`]
    #[must_use]
    pub fn new(value: u16) -> Option<Self> {
        (value <= MAX_SERIAL).then_some(Self(value))
    }

    /// Numeric value
    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Error for strings that are not exactly four ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a four-digit serial")]
pub struct ParseSerialError(String);

impl FromStr for Serial {
    type Err = ParseSerialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseSerialError(s.to_string()));
        }
        s.parse::<u16>()
            .map(Serial)
            .map_err(|_| ParseSerialError(s.to_string()))
    }
}

impl TryFrom<String> for Serial {
    type Error = ParseSerialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Serial> for String {
    fn from(serial: Serial) -> Self {
        serial.to_string()
    }
}

/// Compiled asset tag grammar
///
/// Capture group 1 must hold the four serial digits.
#[derive(Debug, Clone)]
pub struct TagGrammar {
    regex: Regex,
}

impl TagGrammar {
    /// Compile and validate a tag pattern
    ///
    /// # Errors
    ///
    /// [`InvalidGrammarError::Syntax`] if the pattern does not compile,
    /// [`InvalidGrammarError::MissingCapture`] if it has no capture group.
    pub fn new(pattern: &str) -> Result<Self, InvalidGrammarError> {
        let regex = Regex::new(pattern).map_err(|e| InvalidGrammarError::Syntax(e.to_string()))?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 2 {
            return Err(InvalidGrammarError::MissingCapture(pattern.to_string()));
        }
        Ok(Self { regex })
    }

    /// Source pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Serial carried by `name`, if the name matches the grammar
    #[must_use]
    pub fn extract(&self, name: &str) -> Option<Serial> {
        self.regex
            .captures(name)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    }
}

impl Default for TagGrammar {
    #[allow(clippy::expect_used, reason = "constant pattern, exercised by unit tests")]
    fn default() -> Self {
        Self::new(DEFAULT_TAG_PATTERN).expect("default tag pattern compiles")
    }
}

/// Serials in use and the range they span
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialLedger {
    /// Serial to owning name
    pub taken: BTreeMap<Serial, String>,
    /// Lowest serial in use, `0000` when none
    pub lowest_taken: Serial,
    /// Highest serial in use, `0000` when none
    pub highest_taken: Serial,
}

impl SerialLedger {
    /// Serials that may still be issued, ascending
    #[must_use]
    pub fn available(&self) -> Vec<Serial> {
        available_sequence(&self.taken, self.highest_taken)
    }

    /// Number of distinct serials in use
    #[must_use]
    pub fn taken_count(&self) -> usize {
        self.taken.len()
    }
}

/// Scan `names` in order and record every serial found
///
/// When two names carry the same serial the later one wins.
pub fn build_ledger<I, S>(names: I, grammar: &TagGrammar) -> SerialLedger
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut taken = BTreeMap::new();
    for name in names {
        let name = name.as_ref();
        if let Some(serial) = grammar.extract(name) {
            taken.insert(serial, name.to_string());
        }
    }

    let lowest_taken = taken.keys().next().copied().unwrap_or_default();
    let highest_taken = taken.keys().next_back().copied().unwrap_or_default();

    SerialLedger {
        taken,
        lowest_taken,
        highest_taken,
    }
}

/// Issuable serials: unused and strictly above `highest_taken`
#[must_use]
pub fn available_sequence(taken: &BTreeMap<Serial, String>, highest_taken: Serial) -> Vec<Serial> {
    (highest_taken.value() + 1..=MAX_SERIAL)
        .map(Serial)
        .filter(|serial| !taken.contains_key(serial))
        .collect()
}

/// Index actually used for `index` over a sequence of `len` items
#[must_use]
pub fn wrap_index(len: usize, index: usize) -> usize {
    if index >= len { 0 } else { index }
}

/// Serial at `index`, wrapping to the start; `"None"` for an empty sequence
#[must_use]
pub fn preview(available: &[Serial], index: usize) -> String {
    available
        .get(wrap_index(available.len(), index))
        .map_or_else(|| "None".to_string(), ToString::to_string)
}

/// Move the preview cursor forward; [`preview`] takes care of wrapping
#[must_use]
pub fn advance(index: usize) -> usize {
    index.saturating_add(1)
}

/// Holder of a serial in [`list_view`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "name")]
pub enum Occupant {
    /// Held by this name
    Taken(String),
    /// Free
    Available,
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Taken(name) => f.write_str(name),
            Occupant::Available => f.write_str("Available"),
        }
    }
}

/// One row of [`list_view`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRow {
    /// Serial
    pub serial: Serial,
    /// Who holds it
    pub occupant: Occupant,
}

/// Rows from the lowest serial in use to `window` past the highest
///
/// The upper bound is capped at [`MAX_SERIAL`]. Every serial in the range is
/// listed, free ones included.
#[must_use]
pub fn list_view(ledger: &SerialLedger, window: u16) -> Vec<ListRow> {
    let end = ledger.highest_taken.value().saturating_add(window).min(MAX_SERIAL);

    (ledger.lowest_taken.value()..=end)
        .map(|value| {
            let serial = Serial(value);
            let occupant = ledger
                .taken
                .get(&serial)
                .map_or(Occupant::Available, |name| Occupant::Taken(name.clone()));
            ListRow { serial, occupant }
        })
        .collect()
}
