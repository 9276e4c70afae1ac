use anyhow::{anyhow, Result};
use std::{collections::BTreeMap as Map, env};

use crate::services::PropertySource;

/// Properties given for a single invocation, e.g. `-P imageTags=latest,1.0`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties(Map<String, String>);

impl Properties {
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl<K: Into<String>, V: Into<String>> std::iter::FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Properties(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl PropertySource for Properties {
    fn property(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// The process environment. Variables that are set but empty count as unset.
#[derive(Clone, Copy, Debug, Default)]
pub struct Environment;

impl PropertySource for Environment {
    fn property(&self, name: &str) -> Option<String> {
        non_empty(env::var(name).ok())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Parses a `name=value` command line property.
pub fn parse_property(property: &str) -> Result<(String, String)> {
    let split_index = property
        .find('=')
        .ok_or_else(|| anyhow!("expected name=value, got {:?}", property))?;
    let (name, value) = property.split_at(split_index);

    Ok((name.into(), value[1..].into()))
}
