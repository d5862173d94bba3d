//! Completion-candidate assembly and ranking.
//!
//! The pool is drawn from the fixed vocabulary, the other tokens of the
//! cell, the engine's defined constructs and matching filesystem entries,
//! then ranked by fuzzy similarity against the query token and narrowed to
//! literal prefix matches.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::Engine;
use crate::vocabulary;

/// Hard cap on the ranked match list.
pub const MAX_MATCHES: usize = 100;

/// Candidates scoring below this similarity are dropped before ranking.
const SIMILARITY_FLOOR: f64 = 0.1;

/// Ranked matches plus the cursor span they replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReply {
    pub matches: Vec<String>,
    pub cursor_start: usize,
    pub cursor_end: usize,
}

/// Assemble completion candidates for the token ending at `cursor`.
///
/// `cursor` is a character offset into `code`. The query token is the last
/// whitespace-separated fragment before the cursor, stripped of surrounding
/// parentheses and quotes.
pub(crate) fn assemble<E: Engine + ?Sized>(
    engine: &E,
    code: &str,
    cursor: usize,
) -> CompletionReply {
    let prefix: String = code.chars().take(cursor).collect();
    let token = query_token(&prefix);

    if token.is_empty() {
        return CompletionReply {
            matches: Vec::new(),
            cursor_start: cursor,
            cursor_end: cursor,
        };
    }

    let pool = candidate_pool(engine, code, token);
    let matches = rank(&pool, token);
    debug!(
        "completion for '{}': {} candidates, {} matches",
        token,
        pool.len(),
        matches.len()
    );

    CompletionReply {
        matches,
        cursor_start: cursor - token.chars().count(),
        cursor_end: cursor,
    }
}

fn query_token(prefix: &str) -> &str {
    prefix
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .trim_matches(|c| matches!(c, '(' | ')' | '"'))
}

fn candidate_pool<E: Engine + ?Sized>(engine: &E, code: &str, token: &str) -> Vec<String> {
    let mut pool: Vec<String> = vocabulary::completion_vocabulary()
        .iter()
        .map(|entry| entry.to_string())
        .collect();

    // other tokens already present in the cell
    pool.extend(
        code.split_whitespace()
            .map(|t| t.trim_matches(|c| matches!(c, '(' | ')' | '"')))
            .filter(|t| !t.is_empty() && *t != token)
            .map(str::to_string),
    );

    for class in engine.classes() {
        pool.push(class.name);
        pool.extend(class.slots);
    }
    for template in engine.templates() {
        pool.push(template.name);
        pool.extend(template.slots);
    }
    pool.extend(engine.generics());
    pool.extend(engine.functions());
    pool.extend(engine.globals());

    // filesystem entries whose name extends the token
    if let Ok(paths) = glob::glob(&format!("{token}*")) {
        for path in paths.flatten() {
            pool.push(path.to_string_lossy().into_owned());
        }
    }

    pool
}

/// Rank `pool` against `token`: similarity floor, best-match-first (ties
/// keep pool order), dedup, cap, then a hard literal-prefix filter.
fn rank(pool: &[String], token: &str) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = pool
        .iter()
        .map(|candidate| (strsim::jaro_winkler(token, candidate), candidate))
        .filter(|(score, _)| *score >= SIMILARITY_FLOOR)
        .collect();

    // stable sort keeps pool insertion order on equal scores
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let mut seen = HashSet::new();
    let mut matches: Vec<String> = scored
        .into_iter()
        .map(|(_, candidate)| candidate.clone())
        .filter(|candidate| seen.insert(candidate.clone()))
        .take(MAX_MATCHES)
        .collect();
    matches.retain(|candidate| candidate.starts_with(token));

    matches
}
