//! Column-level access control.
//!
//! A [`FieldFilter`] decides whether a named field may take part in a
//! generated statement. It is derived once per request from an optional
//! block-list and an optional allow-list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Anything that can gate a field name.
///
/// Implemented for [`FieldFilter`] and for plain closures, so callers may
/// plug in their own rules.
pub trait FieldPredicate {
    fn accepts(&self, field: &str) -> bool;
}

impl<F> FieldPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn accepts(&self, field: &str) -> bool {
        self(field)
    }
}

/// Block/allow list pair. Empty lists are normalised to "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    block: Option<HashSet<String>>,
    allow: Option<HashSet<String>>,
}

impl FieldFilter {
    /// Build a filter from optional lists.
    pub fn new<B, A, S>(block: Option<B>, allow: Option<A>) -> Self
    where
        B: IntoIterator<Item = S>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            block: normalize(block),
            allow: normalize(allow),
        }
    }

    /// A filter that accepts every field.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn blocking<I, S>(block: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { block: normalize(Some(block)), allow: None }
    }

    pub fn allowing<I, S>(allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { block: None, allow: normalize(Some(allow)) }
    }

    /// True when neither list is present.
    pub fn is_open(&self) -> bool {
        self.block.is_none() && self.allow.is_none()
    }

    pub fn allows(&self, field: &str) -> bool {
        let not_blocked = self.block.as_ref().is_none_or(|b| !b.contains(field));
        let allowed = self.allow.as_ref().is_none_or(|a| a.contains(field));
        not_blocked && allowed
    }
}

impl FieldPredicate for FieldFilter {
    fn accepts(&self, field: &str) -> bool {
        self.allows(field)
    }
}

fn normalize<I, S>(list: Option<I>) -> Option<HashSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: HashSet<String> = list?.into_iter().map(Into::into).collect();
    if set.is_empty() { None } else { Some(set) }
}

/// Access rule as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    #[serde(default)]
    pub block: Vec<String>,
    #[serde(default)]
    pub allow: Vec<String>,
}

impl AccessRule {
    pub fn filter(&self) -> FieldFilter {
        FieldFilter::new(Some(&self.block), Some(&self.allow))
    }
}

/// Per-operation rules for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAccess {
    #[serde(default)]
    pub select: AccessRule,
    #[serde(default)]
    pub insert: AccessRule,
    /// Fields that may be assigned by an update
    #[serde(default)]
    pub update: AccessRule,
    /// Fields that may appear in an update's `where` document
    #[serde(default)]
    pub update_where: AccessRule,
    #[serde(default)]
    pub delete: AccessRule,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 5] = ["id", "name", "email", "password", "age"];

    #[test]
    fn test_no_lists_accepts_everything() {
        let filter = FieldFilter::new(None::<Vec<&str>>, None::<Vec<&str>>);
        assert!(filter.is_open());
        assert!(NAMES.iter().all(|n| filter.allows(n)));
        let empty = FieldFilter::new(Some(Vec::<&str>::new()), Some(Vec::<&str>::new()));
        assert!(empty.is_open());
    }

    #[test]
    fn test_block_and_allow_both_apply() {
        let filter = FieldFilter::new(Some(["password"]), Some(["id", "name", "password"]));
        assert!(filter.allows("id"));
        assert!(!filter.allows("password"));
        assert!(!filter.allows("email"));
    }

    #[test]
    fn test_predicate_matches_independent_rules() {
        // every (block, allow) pair of disjoint subsets of NAMES
        for block_mask in 0u32..32 {
            for allow_mask in 0u32..32 {
                if block_mask & allow_mask != 0 {
                    continue;
                }
                let pick = |mask: u32| -> Vec<&str> {
                    NAMES.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, n)| *n).collect()
                };
                let block = pick(block_mask);
                let allow = pick(allow_mask);
                let filter = FieldFilter::new(Some(block.clone()), Some(allow.clone()));
                for name in NAMES.iter().chain(["other"].iter()) {
                    let expected = !block.contains(name) && (allow.is_empty() || allow.contains(name));
                    assert_eq!(filter.allows(name), expected, "block={block:?} allow={allow:?} name={name}");
                }
            }
        }
    }

    #[test]
    fn test_closure_predicate() {
        let only_short = |f: &str| f.len() <= 3;
        assert!(only_short.accepts("id"));
        assert!(!only_short.accepts("email"));
    }

    #[test]
    fn test_access_rule_from_toml() {
        let rule: AccessRule = toml::from_str("block = [\"password\"]").unwrap();
        let filter = rule.filter();
        assert!(!filter.allows("password"));
        assert!(filter.allows("name"));
    }
}
