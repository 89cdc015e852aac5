use serde::Serialize;
use std::fmt;

/// Canonical aggregation key for a player: the display name trimmed and case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlayerKey(String);

impl PlayerKey {
    pub fn from_raw(name: &str) -> PlayerKey {
        PlayerKey(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An unordered pair of two distinct players. Members are kept sorted so
/// `(a, b)` and `(b, a)` produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CoupleKey {
    first: PlayerKey,
    second: PlayerKey
}

impl CoupleKey {
    /// Returns `None` when both members are the same player.
    pub fn new(a: &PlayerKey, b: &PlayerKey) -> Option<CoupleKey> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(CoupleKey {
                first: a.clone(),
                second: b.clone()
            }),
            std::cmp::Ordering::Greater => Some(CoupleKey {
                first: b.clone(),
                second: a.clone()
            }),
            std::cmp::Ordering::Equal => None
        }
    }

    pub fn first(&self) -> &PlayerKey {
        &self.first
    }

    pub fn second(&self) -> &PlayerKey {
        &self.second
    }
}

impl fmt::Display for CoupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.first, self.second)
    }
}
