//! Poem catalog
//!
//! Immutable mapping from dynasty to an ordered list of poems. Built once at
//! startup from `data/poems.toml`, which is compiled into the binary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::CatalogError;

const EMBEDDED_DATASET: &str = include_str!("../../data/poems.toml");

/// Dynasty classification
///
/// Declaration order is the catalog iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dynasty {
    Tang,
    Song,
    Yuan,
    Ming,
    Qing,
}

impl Dynasty {
    pub const ALL: [Self; 5] = [Self::Tang, Self::Song, Self::Yuan, Self::Ming, Self::Qing];

    /// Wire name of the dynasty
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tang => "唐",
            Self::Song => "宋",
            Self::Yuan => "元",
            Self::Ming => "明",
            Self::Qing => "清",
        }
    }

    /// All wire names as a bracketed list, e.g. `['唐', '宋']`
    pub fn choices_literal() -> String {
        let quoted: Vec<String> = Self::ALL.iter().map(|d| format!("'{d}'")).collect();
        format!("[{}]", quoted.join(", "))
    }
}

impl fmt::Display for Dynasty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dynasty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A single poem
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PoemRecord {
    pub title: String,
    pub author: String,
    pub content: String,
    /// Matching hints; compared by exact element, never by substring
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PoemRecord {
    /// Whether `keyword` occurs in the title or content, or is one of the keywords
    pub fn matches(&self, keyword: &str) -> bool {
        self.title.contains(keyword)
            || self.content.contains(keyword)
            || self.keywords.iter().any(|k| k == keyword)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    poems: BTreeMap<Dynasty, Vec<PoemRecord>>,
}

impl Catalog {
    /// Build the catalog shipped inside the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_toml(EMBEDDED_DATASET)
    }

    /// Parse a dataset where each top-level key is a dynasty name holding an
    /// array of poem tables
    pub fn from_toml(source: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, Vec<PoemRecord>> = toml::from_str(source)?;

        let mut poems = BTreeMap::new();
        for (name, records) in raw {
            let dynasty = name
                .parse::<Dynasty>()
                .map_err(CatalogError::UnknownDynasty)?;
            poems.insert(dynasty, records);
        }

        Ok(Self { poems })
    }

    /// Poems of one dynasty, empty when the dynasty holds no data
    pub fn poems_of(&self, dynasty: Dynasty) -> &[PoemRecord] {
        self.poems.get(&dynasty).map_or(&[][..], Vec::as_slice)
    }

    /// Every poem, dynasty by dynasty in declaration order
    pub fn all_poems(&self) -> impl Iterator<Item = &PoemRecord> {
        self.poems.values().flatten()
    }

    /// Total number of poems
    pub fn len(&self) -> usize {
        self.poems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
