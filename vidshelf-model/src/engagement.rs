use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The per-entry counters tracked by the engagement ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EngagementCounter {
    Views,
    Likes,
    Dislikes,
}

impl EngagementCounter {
    pub const ALL: [EngagementCounter; 3] = [
        EngagementCounter::Views,
        EngagementCounter::Likes,
        EngagementCounter::Dislikes,
    ];

    /// Column backing this counter in the `videos` table.
    pub fn column(self) -> &'static str {
        match self {
            EngagementCounter::Views => "views",
            EngagementCounter::Likes => "likes",
            EngagementCounter::Dislikes => "dislikes",
        }
    }
}

impl fmt::Display for EngagementCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for EngagementCounter {
    type Err = ModelError;

    /// Accepts both the plural counter names and the singular action
    /// names used in routes (`view`, `like`, `dislike`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "views" | "view" => Ok(EngagementCounter::Views),
            "likes" | "like" => Ok(EngagementCounter::Likes),
            "dislikes" | "dislike" => Ok(EngagementCounter::Dislikes),
            other => Err(ModelError::UnknownCounter(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plural_and_singular_forms() {
        assert_eq!("likes".parse(), Ok(EngagementCounter::Likes));
        assert_eq!("Like".parse(), Ok(EngagementCounter::Likes));
        assert_eq!("view".parse(), Ok(EngagementCounter::Views));
        assert_eq!("dislikes".parse(), Ok(EngagementCounter::Dislikes));
    }

    #[test]
    fn rejects_unknown_counters() {
        assert_eq!(
            "shares".parse::<EngagementCounter>(),
            Err(ModelError::UnknownCounter("shares".into()))
        );
    }
}
