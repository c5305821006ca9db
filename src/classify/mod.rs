//! Sheet-name based classification.
//!
//! - [`layout`]: which source layout a sheet follows, and the extraction rules
//!   that come with it.
//! - [`asset`]: which asset category a sheet's seizures concern.
//!
//! The two are independent: a sheet's layout says nothing about its category.
//! Both are ordered first-match-wins tables of [`SubstringRule`]s.

use crate::normalize::text::fold;

pub mod asset;
pub mod layout;

/// Matches when the folded input contains any of `any` and none of `none`.
#[derive(Debug, Clone, Copy)]
pub struct SubstringRule {
    pub any: &'static [&'static str],
    pub none: &'static [&'static str],
}

impl SubstringRule {
    pub const fn any(any: &'static [&'static str]) -> Self {
        Self { any, none: &[] }
    }

    pub const fn excluding(self, none: &'static [&'static str]) -> Self {
        Self { any: self.any, none }
    }

    /// `folded` must already have gone through [`fold`].
    pub fn matches(&self, folded: &str) -> bool {
        self.any.iter().any(|n| folded.contains(&fold(n)))
            && !self.none.iter().any(|n| folded.contains(&fold(n)))
    }
}

/// Evaluate an ordered rule table, returning the first matching result.
pub fn first_match<T: Copy>(table: &[(SubstringRule, T)], input: &str) -> Option<T> {
    let folded = fold(input);
    table
        .iter()
        .find(|(rule, _)| rule.matches(&folded))
        .map(|&(_, result)| result)
}
