use crate::consent::{Category, ConsentChoice, ConsentRecord};
use serde::Serialize;
use strum::IntoEnumIterator;

/// One row in a preference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryToggle {
    pub category: Category,
    pub label: &'static str,
    pub description: &'static str,
    pub enabled: bool,
    /// `false` for categories the visitor cannot switch off.
    pub interactive: bool,
}

/// Unconfirmed edit of the visitor's choice held by a surface.
///
/// Starts from the last known record, or with every optional category off when
/// there is none. Necessary cookies are always on and cannot be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Draft {
    performance: bool,
    functional: bool,
    targeting: bool,
}

impl Draft {
    pub fn from_record(record: Option<&ConsentRecord>) -> Self {
        record.map_or_else(Self::default, |r| Self {
            performance: r.performance,
            functional: r.functional,
            targeting: r.targeting,
        })
    }

    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Necessary => true,
            Category::Performance => self.performance,
            Category::Functional => self.functional,
            Category::Targeting => self.targeting,
        }
    }

    /// Returns `false` if the category is not user-controllable.
    pub fn set(&mut self, category: Category, enabled: bool) -> bool {
        match category {
            Category::Necessary => return false,
            Category::Performance => self.performance = enabled,
            Category::Functional => self.functional = enabled,
            Category::Targeting => self.targeting = enabled,
        }
        true
    }

    pub fn toggle(&mut self, category: Category) -> bool {
        let next = !self.get(category);
        self.set(category, next)
    }

    pub fn to_choice(&self) -> ConsentChoice {
        ConsentChoice {
            necessary: Some(true),
            performance: Some(self.performance),
            functional: Some(self.functional),
            targeting: Some(self.targeting),
        }
    }

    pub fn toggles(&self) -> Vec<CategoryToggle> {
        Category::iter()
            .map(|category| CategoryToggle {
                category,
                label: category.label(),
                description: category.description(),
                enabled: self.get(category),
                interactive: category.is_optional(),
            })
            .collect()
    }
}
