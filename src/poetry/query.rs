//! Poem query
//!
//! Request parsing and validation, the dynasty → keyword filter and the
//! random pick. Randomness comes from a [`RandomSource`] so callers decide
//! how the final choice is made.

use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, Dynasty, PoemRecord};
use super::error::QueryError;

/// In-band message returned when no poem survives filtering
pub const NO_MATCH_MESSAGE: &str = "未找到匹配的古诗词，请尝试其他关键词或朝代";

/// Dynasty echoed back when the request did not restrict one
pub const UNRESTRICTED_DYNASTY: &str = "不限";

const QUERY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw `/mcp/call` body
#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    pub keyword: Option<String>,
    pub dynasty: Option<String>,
}

impl QueryRequest {
    /// Parse a request body, which must be a JSON object
    pub fn from_slice(body: &[u8]) -> Result<Self, QueryError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| QueryError::InvalidBody(e.to_string()))?;

        if !value.is_object() {
            return Err(QueryError::InvalidBody("expected a JSON object".to_string()));
        }

        serde_json::from_value(value).map_err(|e| QueryError::InvalidBody(e.to_string()))
    }

    /// Trim the keyword and resolve the dynasty name
    ///
    /// An empty dynasty string counts as no restriction. Any other name must
    /// belong to the enumerated set, whether or not the catalog holds poems for it.
    pub fn validate(&self) -> Result<PoemQuery, QueryError> {
        let keyword = self.keyword.as_deref().unwrap_or_default().trim().to_string();

        let dynasty = match self.dynasty.as_deref() {
            None | Some("") => None,
            Some(name) => Some(
                name.parse::<Dynasty>()
                    .map_err(QueryError::UnsupportedDynasty)?,
            ),
        };

        Ok(PoemQuery { keyword, dynasty })
    }
}

/// Validated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemQuery {
    pub keyword: String,
    pub dynasty: Option<Dynasty>,
}

impl PoemQuery {
    /// Candidate set: dynasty stage first, then the keyword stage
    pub fn candidates<'a>(&self, catalog: &'a Catalog) -> Vec<&'a PoemRecord> {
        let scoped: Vec<&PoemRecord> = match self.dynasty {
            Some(dynasty) => catalog.poems_of(dynasty).iter().collect(),
            None => catalog.all_poems().collect(),
        };

        if self.keyword.is_empty() {
            return scoped;
        }

        scoped
            .into_iter()
            .filter(|poem| poem.matches(&self.keyword))
            .collect()
    }

    /// Dynasty label for the response
    pub fn dynasty_label(&self) -> &'static str {
        self.dynasty.map_or(UNRESTRICTED_DYNASTY, Dynasty::as_str)
    }
}

/// Picks an index in `0..len`
pub trait RandomSource {
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform choice backed by the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Poem returned by `/mcp/call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoemHit {
    pub title: String,
    pub author: String,
    pub dynasty: String,
    pub content: String,
    pub query_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Found(PoemHit),
    NoMatch,
}

/// Run a validated query against the catalog
pub fn run_query<R: RandomSource + ?Sized>(
    catalog: &Catalog,
    query: &PoemQuery,
    rng: &mut R,
    now: DateTime<Local>,
) -> QueryOutcome {
    let candidates = query.candidates(catalog);
    if candidates.is_empty() {
        return QueryOutcome::NoMatch;
    }

    let index = rng.pick(candidates.len()).min(candidates.len() - 1);
    let poem = candidates[index];

    QueryOutcome::Found(PoemHit {
        title: poem.title.clone(),
        author: poem.author.clone(),
        dynasty: query.dynasty_label().to_string(),
        content: poem.content.clone(),
        query_time: now.format(QUERY_TIME_FORMAT).to_string(),
    })
}
