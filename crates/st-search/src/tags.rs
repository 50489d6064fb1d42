//! Quick tags: single-click presets, mutually exclusive within each group.
//!
//! Toggling the value a group already holds clears the group.

use std::fmt;
use std::str::FromStr;

use st_core::SearchEntity;

use crate::entity::{TagKind, profile};
use crate::error::SearchError;

/// Kind of intellectual property, matched through a search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpKind {
    Patent,
    Copyright,
    Trademark,
}

impl IpKind {
    /// Term the server indexes this kind under.
    pub const fn search_term(self) -> &'static str {
        match self {
            Self::Patent => "专利",
            Self::Copyright => "软著",
            Self::Trademark => "商标",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patent => "patent",
            Self::Copyright => "copyright",
            Self::Trademark => "trademark",
        }
    }
}

impl fmt::Display for IpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patent" => Ok(Self::Patent),
            "copyright" | "software_copyright" => Ok(Self::Copyright),
            "trademark" => Ok(Self::Trademark),
            other => Err(SearchError::InvalidFilter {
                key: "ip_kind".into(),
                reason: format!("'{other}' is not one of patent, copyright, trademark"),
            }),
        }
    }
}

/// Active quick tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickTags {
    pub fixed_price: bool,
    pub completed: bool,
    pub years: Option<u32>,
    /// Minimum amount in units of 10 000.
    pub min_wan: Option<u32>,
    pub group: Option<String>,
    pub category: Option<String>,
    pub not_expired: bool,
    pub ip_kind: Option<IpKind>,
}

fn toggle<T: PartialEq>(slot: &mut Option<T>, value: T) {
    if slot.as_ref() == Some(&value) {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}

impl QuickTags {
    pub const fn toggle_fixed_price(&mut self) {
        self.fixed_price = !self.fixed_price;
    }

    pub const fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    pub fn toggle_years(&mut self, years: u32) {
        toggle(&mut self.years, years);
    }

    pub fn toggle_min_wan(&mut self, wan: u32) {
        toggle(&mut self.min_wan, wan);
    }

    pub fn toggle_group(&mut self, code: impl Into<String>) {
        toggle(&mut self.group, code.into());
    }

    pub fn toggle_category(&mut self, category: impl Into<String>) {
        toggle(&mut self.category, category.into());
    }

    pub const fn toggle_not_expired(&mut self) {
        self.not_expired = !self.not_expired;
    }

    pub fn toggle_ip_kind(&mut self, kind: IpKind) {
        toggle(&mut self.ip_kind, kind);
    }

    /// Whether `kind` currently has a value.
    pub fn is_set(&self, kind: TagKind) -> bool {
        match kind {
            TagKind::FixedPrice => self.fixed_price,
            TagKind::Completed => self.completed,
            TagKind::Years => self.years.is_some_and(|years| years > 0),
            TagKind::MinAmount => self.min_wan.is_some_and(|wan| wan > 0),
            TagKind::Group => self.group.as_deref().is_some_and(|g| !g.trim().is_empty()),
            TagKind::Category => self
                .category
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty()),
            TagKind::NotExpired => self.not_expired,
            TagKind::IpKind => self.ip_kind.is_some(),
        }
    }

    /// Whether any tag meaningful to `entity` is set.
    pub fn is_active_for(&self, entity: SearchEntity) -> bool {
        profile(entity).tags.iter().any(|kind| self.is_set(*kind))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn toggling_same_value_clears_group() {
        let mut tags = QuickTags::default();
        tags.toggle_years(3);
        assert_eq!(tags.years, Some(3));
        tags.toggle_years(5);
        assert_eq!(tags.years, Some(5));
        tags.toggle_years(5);
        assert_eq!(tags.years, None);
    }

    #[test]
    fn boolean_tags_flip() {
        let mut tags = QuickTags::default();
        tags.toggle_fixed_price();
        tags.toggle_not_expired();
        assert!(tags.fixed_price && tags.not_expired);
        tags.toggle_fixed_price();
        assert!(!tags.fixed_price);
    }

    #[test]
    fn activity_only_counts_tags_the_entity_understands() {
        let mut tags = QuickTags::default();
        tags.toggle_fixed_price();
        assert!(tags.is_active_for(SearchEntity::Contracts));
        assert!(!tags.is_active_for(SearchEntity::Qualifications));
        assert!(!tags.is_active_for(SearchEntity::Companies));

        tags.toggle_group("1100");
        assert!(tags.is_active_for(SearchEntity::Qualifications));
        assert!(tags.is_active_for(SearchEntity::Personnel));
    }

    #[rstest]
    #[case("patent", IpKind::Patent, "专利")]
    #[case("Copyright", IpKind::Copyright, "软著")]
    #[case("trademark", IpKind::Trademark, "商标")]
    fn ip_kinds_parse_and_map_to_terms(
        #[case] raw: &str,
        #[case] kind: IpKind,
        #[case] term: &str,
    ) {
        let parsed: IpKind = raw.parse().expect("known kind");
        assert_eq!(parsed, kind);
        assert_eq!(parsed.search_term(), term);
    }

    #[test]
    fn unknown_ip_kind_is_rejected() {
        assert!("domain".parse::<IpKind>().is_err());
    }
}
