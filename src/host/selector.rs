//! Compound attribute/class selectors.
//!
//! A small subset of CSS selectors, enough for the structural heuristics
//! used by the host-page guard: attribute presence, attribute equality,
//! attribute substring and class membership, combined conjunctively.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    HasAttr(String),
    AttrEquals(String, String),
    AttrContains(String, String),
    Class(String),
}

/// A compound selector such as `[role="menu"][aria-label*="command"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    conditions: Vec<Condition>,
}

impl Selector {
    /// Creates a selector that matches every element.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Requires the attribute to be present (`[name]`).
    #[must_use]
    pub fn attr(mut self, name: &str) -> Self {
        self.conditions.push(Condition::HasAttr(name.to_string()));
        self
    }

    /// Requires the attribute to equal `value` (`[name="value"]`).
    #[must_use]
    pub fn attr_eq(mut self, name: &str, value: &str) -> Self {
        self.conditions
            .push(Condition::AttrEquals(name.to_string(), value.to_string()));
        self
    }

    /// Requires the attribute to contain `value` (`[name*="value"]`).
    #[must_use]
    pub fn attr_contains(mut self, name: &str, value: &str) -> Self {
        self.conditions
            .push(Condition::AttrContains(name.to_string(), value.to_string()));
        self
    }

    /// Requires the class (`.name`).
    #[must_use]
    pub fn class(mut self, name: &str) -> Self {
        self.conditions.push(Condition::Class(name.to_string()));
        self
    }

    /// Tests an element's attributes and classes.
    #[must_use]
    pub fn matches(&self, attributes: &BTreeMap<String, String>, classes: &[String]) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::HasAttr(name) => attributes.contains_key(name),
            Condition::AttrEquals(name, value) => attributes.get(name) == Some(value),
            Condition::AttrContains(name, value) => attributes
                .get(name)
                .is_some_and(|actual| actual.contains(value.as_str())),
            Condition::Class(name) => classes.iter().any(|class| class == name),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return f.write_str("*");
        }
        for condition in &self.conditions {
            match condition {
                Condition::HasAttr(name) => write!(f, "[{name}]")?,
                Condition::AttrEquals(name, value) => write!(f, "[{name}=\"{value}\"]")?,
                Condition::AttrContains(name, value) => write!(f, "[{name}*=\"{value}\"]")?,
                Condition::Class(name) => write!(f, ".{name}")?,
            }
        }
        Ok(())
    }
}
