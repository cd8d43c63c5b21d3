use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Cookie categories a visitor can be asked about.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Necessary,
    Performance,
    Functional,
    Targeting,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Necessary => "Strictly necessary",
            Self::Performance => "Performance",
            Self::Functional => "Functional",
            Self::Targeting => "Targeting",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Necessary => {
                "Required for the site to work, such as remembering this choice. Always on."
            }
            Self::Performance => {
                "Anonymous usage statistics that help us understand how the site is used."
            }
            Self::Functional => "Remember preferences such as language or region.",
            Self::Targeting => "Used to measure and personalise marketing campaigns.",
        }
    }

    /// Whether a visitor may switch this category off.
    pub fn is_optional(self) -> bool {
        !matches!(self, Self::Necessary)
    }
}

/// The persisted visitor decision.
///
/// A record is always complete: all four flags plus the write time in epoch
/// milliseconds. `necessary` is `true` for every record this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub necessary: bool,
    pub performance: bool,
    pub functional: bool,
    pub targeting: bool,
    pub timestamp: i64,
}

impl ConsentRecord {
    /// Preference equality: the four flags match, timestamp ignored.
    pub fn same_preferences(&self, other: &Self) -> bool {
        self.necessary == other.necessary
            && self.performance == other.performance
            && self.functional == other.functional
            && self.targeting == other.targeting
    }

    pub fn allows(&self, category: Category) -> bool {
        match category {
            Category::Necessary => self.necessary,
            Category::Performance => self.performance,
            Category::Functional => self.functional,
            Category::Targeting => self.targeting,
        }
    }

    pub fn as_choice(&self) -> ConsentChoice {
        ConsentChoice {
            necessary: Some(self.necessary),
            performance: Some(self.performance),
            functional: Some(self.functional),
            targeting: Some(self.targeting),
        }
    }

    /// `true` when every optional category is granted.
    pub fn is_accept_all(&self) -> bool {
        self.performance && self.functional && self.targeting
    }
}

/// A partial set of flags, as submitted by a surface or parsed from input.
///
/// `necessary` is accepted so that callers can round-trip a record, but it is
/// ignored by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsentChoice {
    #[serde(default)]
    pub necessary: Option<bool>,
    #[serde(default)]
    pub performance: Option<bool>,
    #[serde(default)]
    pub functional: Option<bool>,
    #[serde(default)]
    pub targeting: Option<bool>,
}

impl ConsentChoice {
    pub fn accept_all() -> Self {
        Self {
            necessary: Some(true),
            performance: Some(true),
            functional: Some(true),
            targeting: Some(true),
        }
    }

    pub fn essential_only() -> Self {
        Self {
            necessary: Some(true),
            performance: Some(false),
            functional: Some(false),
            targeting: Some(false),
        }
    }

    pub fn with(mut self, category: Category, granted: bool) -> Self {
        match category {
            Category::Necessary => self.necessary = Some(granted),
            Category::Performance => self.performance = Some(granted),
            Category::Functional => self.functional = Some(granted),
            Category::Targeting => self.targeting = Some(granted),
        }
        self
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build a full record from a partial choice, stamped with the current time.
pub fn normalize(choice: &ConsentChoice) -> ConsentRecord {
    normalize_at(choice, now_millis())
}

/// Build a full record from a partial choice with an explicit timestamp.
///
/// `necessary` is forced on and missing flags default to off. Never fails.
pub fn normalize_at(choice: &ConsentChoice, timestamp: i64) -> ConsentRecord {
    ConsentRecord {
        necessary: true,
        performance: choice.performance.unwrap_or(false),
        functional: choice.functional.unwrap_or(false),
        targeting: choice.targeting.unwrap_or(false),
        timestamp,
    }
}

pub fn allows_analytics(record: &ConsentRecord) -> bool {
    record.performance
}
