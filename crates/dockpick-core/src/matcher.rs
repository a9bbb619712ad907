//! Resolve a user-typed token to containers in the snapshot
//!
//! An exact name match wins outright; otherwise every container whose name
//! contains the token is a candidate. Both comparisons are case-sensitive.

use crate::Container;

/// Outcome of resolving a token against a pool of containers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    None,
    Unique(Container),
    /// All substring hits, in pool order
    Ambiguous(Vec<Container>),
}

impl MatchResult {
    /// Names of every container this result refers to
    pub fn names(&self) -> Vec<&str> {
        match self {
            MatchResult::None => Vec::new(),
            MatchResult::Unique(c) => vec![c.name.as_str()],
            MatchResult::Ambiguous(cs) => cs.iter().map(|c| c.name.as_str()).collect(),
        }
    }
}

/// Resolve `token` against `pool`
pub fn resolve(token: &str, pool: &[Container]) -> MatchResult {
    if let Some(exact) = pool.iter().find(|c| c.name == token) {
        return MatchResult::Unique(exact.clone());
    }

    let mut hits: Vec<Container> = pool
        .iter()
        .filter(|c| c.name.contains(token))
        .cloned()
        .collect();

    match hits.len() {
        0 => MatchResult::None,
        1 => MatchResult::Unique(hits.remove(0)),
        _ => MatchResult::Ambiguous(hits),
    }
}
