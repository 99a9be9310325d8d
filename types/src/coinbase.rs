//! Validator signing addresses and the sorted validator set a node reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address a node uses when producing blocks as an IBFT validator.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coinbase(String);

impl Coinbase {
    pub fn new(raw: impl Into<String>) -> Self {
        let s: String = raw.into();
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Coinbase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Coinbase {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Coinbases a node currently recognizes as validators, kept sorted.
///
/// Membership is answered by binary search, so the backing vector is sorted
/// on every construction path and never exposed mutably.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Coinbase>", into = "Vec<Coinbase>")]
pub struct ValidatorSet(Vec<Coinbase>);

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, coinbase: &Coinbase) -> bool {
        self.0.binary_search(coinbase).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coinbase> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Coinbase] {
        &self.0
    }
}

impl From<Vec<Coinbase>> for ValidatorSet {
    fn from(mut members: Vec<Coinbase>) -> Self {
        members.sort();
        Self(members)
    }
}

impl From<ValidatorSet> for Vec<Coinbase> {
    fn from(set: ValidatorSet) -> Self {
        set.0
    }
}

impl FromIterator<Coinbase> for ValidatorSet {
    fn from_iter<I: IntoIterator<Item = Coinbase>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
