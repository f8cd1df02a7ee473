//! Status lifecycles for each item kind
//!
//! ```text
//! Found:  available <-> claimed -> resolved
//!         available ----------> resolved
//! Lost:   missing <-> recovered
//! Share:  available <-> reserved -> given
//!         available ----------> given
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::CoreError;

macro_rules! status_strings {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Returns the wire and storage representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(CoreError::validation(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

/// Status of a found item report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoundItemStatus {
    /// Waiting for its owner; claims are accepted
    Available,
    /// A claim was approved, or the reporter marked it claimed
    Claimed,
    /// Handed back; terminal
    Resolved,
}

status_strings!(FoundItemStatus {
    Available => "available",
    Claimed => "claimed",
    Resolved => "resolved",
});

impl FoundItemStatus {
    /// Whether new claims may be filed against the item
    pub fn accepts_claims(&self) -> bool {
        matches!(self, FoundItemStatus::Available)
    }

    /// Checks if the reporter may move the item to `target`
    pub fn can_transition_to(&self, target: FoundItemStatus) -> bool {
        use FoundItemStatus::*;
        matches!(
            (*self, target),
            (Available, Claimed) |
            (Available, Resolved) |
            (Claimed, Resolved) |
            (Claimed, Available)
        ) || *self == target
    }
}

/// Status of a lost item report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LostItemStatus {
    /// Still being looked for
    Missing,
    /// The reporter got it back
    Recovered,
}

status_strings!(LostItemStatus {
    Missing => "missing",
    Recovered => "recovered",
});

impl LostItemStatus {
    pub fn can_transition_to(&self, _target: LostItemStatus) -> bool {
        true
    }
}

/// Status of a shared item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareItemStatus {
    /// Up for grabs
    Available,
    /// Promised to someone, not handed over yet
    Reserved,
    /// Handed over; terminal
    Given,
}

status_strings!(ShareItemStatus {
    Available => "available",
    Reserved => "reserved",
    Given => "given",
});

impl ShareItemStatus {
    pub fn can_transition_to(&self, target: ShareItemStatus) -> bool {
        use ShareItemStatus::*;
        matches!(
            (*self, target),
            (Available, Reserved) |
            (Available, Given) |
            (Reserved, Available) |
            (Reserved, Given)
        ) || *self == target
    }
}

/// Builds the error returned for a rejected status change
pub(crate) fn transition_error(from: impl fmt::Display, to: impl fmt::Display) -> CoreError {
    CoreError::invalid_state(format!("cannot move item from {} to {}", from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_status_strings() {
        assert_eq!(FoundItemStatus::Available.as_str(), "available");
        assert_eq!("claimed".parse::<FoundItemStatus>().unwrap(), FoundItemStatus::Claimed);
        assert!("lost".parse::<FoundItemStatus>().is_err());
    }

    #[test]
    fn test_resolved_is_terminal() {
        let resolved = FoundItemStatus::Resolved;
        assert!(!resolved.can_transition_to(FoundItemStatus::Available));
        assert!(!resolved.can_transition_to(FoundItemStatus::Claimed));
    }

    #[test]
    fn test_only_available_accepts_claims() {
        assert!(FoundItemStatus::Available.accepts_claims());
        assert!(!FoundItemStatus::Claimed.accepts_claims());
        assert!(!FoundItemStatus::Resolved.accepts_claims());
    }

    #[test]
    fn test_given_is_terminal() {
        assert!(!ShareItemStatus::Given.can_transition_to(ShareItemStatus::Available));
        assert!(ShareItemStatus::Reserved.can_transition_to(ShareItemStatus::Given));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&LostItemStatus::Recovered).unwrap();
        assert_eq!(json, "\"recovered\"");
    }
}
