//! Transcript matching
//!
//! Finds the command a transcript refers to. Matching runs in two stages:
//!
//! 1. **Exact**: a normalized keyword appears verbatim inside the normalized
//!    transcript. The longest such keyword wins, ties go to registry order,
//!    so "stop listening" resolves to `stop-listening` rather than `listen`.
//! 2. **Fuzzy**: otherwise every keyword is scored with
//!    `0.6 * similarity + 0.4 * word_match` and the best score wins if it
//!    reaches the threshold.

mod normalize;

pub use normalize::normalize;

use tracing::debug;

use crate::commands::VoiceCommand;

/// Default minimum fuzzy score for a match
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

const SIMILARITY_WEIGHT: f64 = 0.6;
const WORD_MATCH_WEIGHT: f64 = 0.4;

/// How a command was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Keyword found verbatim in the transcript
    Exact,
    /// Keyword scored above the threshold
    Fuzzy,
}

/// A matched command together with the keyword that matched it
#[derive(Debug, Clone, Copy)]
pub struct CommandMatch<'a> {
    pub command: &'a VoiceCommand,
    /// The keyword that produced the match, as written in the command
    pub keyword: &'a str,
    pub kind: MatchKind,
    /// 1.0 for exact matches, the combined score for fuzzy ones
    pub score: f64,
}

/// Levenshtein similarity in `[0, 1]` on already-normalized strings
///
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    1.0 - distance as f64 / max_len as f64
}

/// Fraction of keyword words found in (or containing) some transcript word
pub fn word_match_score(transcript: &str, keyword: &str) -> f64 {
    let keyword_words: Vec<&str> = keyword.split_whitespace().collect();
    if keyword_words.is_empty() {
        return 0.0;
    }
    let transcript_words: Vec<&str> = transcript.split_whitespace().collect();

    let matched = keyword_words
        .iter()
        .filter(|kw| {
            transcript_words
                .iter()
                .any(|tw| tw.contains(**kw) || kw.contains(*tw))
        })
        .count();

    matched as f64 / keyword_words.len() as f64
}

/// Combined fuzzy score of a normalized transcript against a normalized keyword
pub fn combined_score(transcript: &str, keyword: &str) -> f64 {
    SIMILARITY_WEIGHT * similarity(transcript, keyword)
        + WORD_MATCH_WEIGHT * word_match_score(transcript, keyword)
}

/// Find the command a transcript refers to
pub fn find_best_match<'a>(
    transcript: &str,
    commands: &'a [VoiceCommand],
    threshold: f64,
) -> Option<&'a VoiceCommand> {
    find_best_match_detailed(transcript, commands, threshold).map(|m| m.command)
}

/// Like [`find_best_match`] but reports the keyword, kind and score
pub fn find_best_match_detailed<'a>(
    transcript: &str,
    commands: &'a [VoiceCommand],
    threshold: f64,
) -> Option<CommandMatch<'a>> {
    let normalized: Vec<Vec<String>> = commands
        .iter()
        .map(|c| c.keywords.iter().map(|k| normalize(k)).collect())
        .collect();

    best_match(
        transcript,
        commands.iter().zip(normalized.iter().map(Vec::as_slice)),
        threshold,
    )
}

/// Core search over commands paired with their normalized keywords
///
/// `candidates` must yield one normalized keyword per entry of
/// `command.keywords`, in the same order.
pub(crate) fn best_match<'a, 'n, I>(
    transcript: &str,
    candidates: I,
    threshold: f64,
) -> Option<CommandMatch<'a>>
where
    I: IntoIterator<Item = (&'a VoiceCommand, &'n [String])>,
{
    let text = normalize(transcript);
    if text.is_empty() {
        return None;
    }
    let text_len = text.chars().count();

    let mut exact: Option<(CommandMatch<'a>, usize)> = None;
    let mut fuzzy: Option<CommandMatch<'a>> = None;
    let mut best_score = 0.0_f64;

    for (command, keywords) in candidates {
        for (raw, keyword) in command.keywords.iter().zip(keywords) {
            if keyword.is_empty() {
                continue;
            }
            let keyword_len = keyword.chars().count();

            if text.contains(keyword.as_str()) {
                let longer = exact.as_ref().is_none_or(|(_, len)| keyword_len > *len);
                if longer {
                    exact = Some((
                        CommandMatch {
                            command,
                            keyword: raw,
                            kind: MatchKind::Exact,
                            score: 1.0,
                        },
                        keyword_len,
                    ));
                }
                continue;
            }

            if exact.is_some() {
                continue;
            }

            // Levenshtein distance is at least the length difference, which
            // caps the reachable score without building the full matrix.
            let word = word_match_score(&text, keyword);
            let max_len = text_len.max(keyword_len) as f64;
            let len_gap = text_len.abs_diff(keyword_len) as f64;
            let bound = SIMILARITY_WEIGHT * (1.0 - len_gap / max_len) + WORD_MATCH_WEIGHT * word;
            if bound <= best_score || bound < threshold {
                continue;
            }

            let score = SIMILARITY_WEIGHT * similarity(&text, keyword) + WORD_MATCH_WEIGHT * word;
            if score > best_score {
                best_score = score;
                if score >= threshold {
                    fuzzy = Some(CommandMatch {
                        command,
                        keyword: raw,
                        kind: MatchKind::Fuzzy,
                        score,
                    });
                }
            }
        }
    }

    if let Some((hit, _)) = exact {
        debug!(command = %hit.command.id, keyword = hit.keyword, "Exact keyword match");
        return Some(hit);
    }

    match fuzzy {
        Some(hit) => {
            debug!(
                command = %hit.command.id,
                keyword = hit.keyword,
                score = hit.score,
                "Fuzzy keyword match"
            );
            Some(hit)
        }
        None => {
            debug!(transcript = %text, best_score, threshold, "No command matched");
            None
        }
    }
}
