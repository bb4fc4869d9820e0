//! Search attribute declarations.
//!
//! # Responsibilities
//! - Define the closed set of indexed value types
//! - Pair attribute names with type tokens into a name → type map
//!
//! # Design Decisions
//! - Type tokens match exactly and case-sensitively
//! - An unknown token fails the whole parse; no partial map is returned
//! - Duplicate names are last-write-wins, there is no duplicate check

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value type of an indexed search attribute.
///
/// The engine's `Unspecified` placeholder is not part of this set;
/// `--search-attributes-type Unspecified` fails like any other unknown token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexedValueType {
    Text,
    Keyword,
    Int,
    Double,
    Bool,
    Datetime,
    KeywordList,
}

impl IndexedValueType {
    /// Every recognized type, in declaration order.
    pub const ALL: [IndexedValueType; 7] = [
        IndexedValueType::Text,
        IndexedValueType::Keyword,
        IndexedValueType::Int,
        IndexedValueType::Double,
        IndexedValueType::Bool,
        IndexedValueType::Datetime,
        IndexedValueType::KeywordList,
    ];

    /// The token that names this type on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexedValueType::Text => "Text",
            IndexedValueType::Keyword => "Keyword",
            IndexedValueType::Int => "Int",
            IndexedValueType::Double => "Double",
            IndexedValueType::Bool => "Bool",
            IndexedValueType::Datetime => "Datetime",
            IndexedValueType::KeywordList => "KeywordList",
        }
    }
}

impl fmt::Display for IndexedValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexedValueType {
    type Err = SearchAttributeError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == token)
            .ok_or_else(|| SearchAttributeError::UnknownType(token.to_string()))
    }
}

/// Registered search attributes keyed by name.
pub type SearchAttributes = BTreeMap<String, IndexedValueType>;

/// Errors produced while building [`SearchAttributes`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchAttributeError {
    /// A type token did not name a known value type.
    #[error("the type: {0} is not a valid type for a search attribute")]
    UnknownType(String),

    /// Names and type tokens were not paired one to one.
    #[error("got {keys} search attribute keys but {types} types")]
    LengthMismatch { keys: usize, types: usize },
}

/// Name and type lists as passed on the command line, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttributeRequest {
    pub keys: Vec<String>,
    pub types: Vec<String>,
}

impl SearchAttributeRequest {
    pub fn parse(&self) -> Result<SearchAttributes, SearchAttributeError> {
        parse_search_attributes(&self.keys, &self.types)
    }
}

/// Pair `keys[i]` with `types[i]`.
///
/// Fails on the first unresolved type token. A name that appears more than
/// once keeps the type from its last occurrence.
pub fn parse_search_attributes(
    keys: &[String],
    types: &[String],
) -> Result<SearchAttributes, SearchAttributeError> {
    if keys.len() != types.len() {
        return Err(SearchAttributeError::LengthMismatch {
            keys: keys.len(),
            types: types.len(),
        });
    }

    let mut attributes = SearchAttributes::new();
    for (key, token) in keys.iter().zip(types) {
        let ty = token.parse::<IndexedValueType>()?;
        attributes.insert(key.clone(), ty);
    }
    Ok(attributes)
}
