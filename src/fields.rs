//! Enumerations for to-do item metadata.
//!
//! This module defines the fixed option sets an item can take for repeat
//! frequency, priority, and reminder lead time, together with the display
//! labels used by the form selectors and the list view.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How often a to-do item recurs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    Never,
    Daily,
    Weekly,
    Monthly,
    Annually,
}

impl Repeat {
    pub const ALL: [Repeat; 5] = [
        Repeat::Never,
        Repeat::Daily,
        Repeat::Weekly,
        Repeat::Monthly,
        Repeat::Annually,
    ];

    /// Display label used in selectors and list output.
    pub fn label(self) -> &'static str {
        match self {
            Repeat::Never => "never",
            Repeat::Daily => "daily",
            Repeat::Weekly => "weekly",
            Repeat::Monthly => "monthly",
            Repeat::Annually => "annually",
        }
    }

    pub fn from_label(s: &str) -> Option<Repeat> {
        Repeat::ALL.into_iter().find(|r| r.label() == s)
    }
}

/// Importance of a to-do item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_label(s: &str) -> Option<Priority> {
        Priority::ALL.into_iter().find(|p| p.label() == s)
    }
}

/// How far ahead of the due date to remind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Reminder {
    None,
    AtTime,
    TenMinutesBefore,
    OneHourBefore,
    OneDayBefore,
}

impl Reminder {
    pub const ALL: [Reminder; 5] = [
        Reminder::None,
        Reminder::AtTime,
        Reminder::TenMinutesBefore,
        Reminder::OneHourBefore,
        Reminder::OneDayBefore,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Reminder::None => "none",
            Reminder::AtTime => "at time of event",
            Reminder::TenMinutesBefore => "10 minutes before",
            Reminder::OneHourBefore => "1 hour before",
            Reminder::OneDayBefore => "1 day before",
        }
    }

    pub fn from_label(s: &str) -> Option<Reminder> {
        Reminder::ALL.into_iter().find(|r| r.label() == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for r in Repeat::ALL {
            assert_eq!(Repeat::from_label(r.label()), Some(r));
        }
        for p in Priority::ALL {
            assert_eq!(Priority::from_label(p.label()), Some(p));
        }
        for r in Reminder::ALL {
            assert_eq!(Reminder::from_label(r.label()), Some(r));
        }
    }

    #[test]
    fn unknown_label_is_none() {
        assert_eq!(Repeat::from_label("fortnightly"), None);
        assert_eq!(Priority::from_label(""), None);
    }
}
