use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::ops::Range;

use regex::Regex;
use tracing::warn;

use crate::cli::DedupeMode;
use crate::model::PatternCount;

/// A family of marker regexes, ordered by priority.
pub trait PatternSource: Copy + Debug + Eq {
    fn as_str(self) -> &'static str;
}

/// A region matched by one marker pattern, before resolution.
///
/// `span` starts at the captured marker label and ends where the next marker
/// of the same pattern begins (or at end of text). `captured` is the trimmed
/// text following the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate<P> {
    pub source: P,
    pub priority: usize,
    pub span: Range<usize>,
    pub label: String,
    pub key: String,
    pub captured: String,
}

#[derive(Debug)]
pub struct MarkerPattern<P> {
    pub source: P,
    pub marker: Regex,
}

#[derive(Debug)]
pub struct Segmentation<P> {
    pub resolved: Vec<MatchCandidate<P>>,
    pub pattern_counts: Vec<PatternCount>,
    pub candidates_kept: usize,
}

impl<P> Segmentation<P> {
    pub fn duplicates_dropped(&self) -> usize {
        self.candidates_kept.saturating_sub(self.resolved.len())
    }
}

/// Runs every pattern over the whole text, filters with `keep`, then resolves
/// the surviving candidates with `mode`.
pub fn segment<P, K, F>(
    text: &str,
    patterns: &[MarkerPattern<P>],
    normalize_key: K,
    keep: F,
    mode: DedupeMode,
) -> Segmentation<P>
where
    P: PatternSource,
    K: Fn(&str) -> String,
    F: Fn(P, &str) -> bool,
{
    let mut candidates = Vec::new();
    let mut pattern_counts = Vec::with_capacity(patterns.len());

    for (priority, pattern) in patterns.iter().enumerate() {
        let scanned = scan_markers(text, pattern, priority, &normalize_key);
        let matched = scanned.len();
        let kept = scanned
            .into_iter()
            .filter(|candidate| keep(candidate.source, &candidate.captured))
            .collect::<Vec<_>>();

        pattern_counts.push(PatternCount {
            pattern: pattern.source.as_str().to_string(),
            matched,
            kept: kept.len(),
        });
        candidates.extend(kept);
    }

    let candidates_kept = candidates.len();
    Segmentation {
        resolved: resolve(candidates, mode),
        pattern_counts,
        candidates_kept,
    }
}

/// Content of each marker runs up to the next marker of the same pattern.
/// The marker regex must capture its label in group 1.
pub fn scan_markers<P, K>(
    text: &str,
    pattern: &MarkerPattern<P>,
    priority: usize,
    normalize_key: K,
) -> Vec<MatchCandidate<P>>
where
    P: PatternSource,
    K: Fn(&str) -> String,
{
    struct Marker<'a> {
        match_start: usize,
        label_start: usize,
        content_start: usize,
        label: &'a str,
    }

    let markers = pattern
        .marker
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let label = captures.get(1)?;
            Some(Marker {
                match_start: whole.start(),
                label_start: label.start(),
                content_start: whole.end(),
                label: label.as_str(),
            })
        })
        .collect::<Vec<_>>();

    markers
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let content_end = markers
                .get(index + 1)
                .map(|next| next.match_start)
                .unwrap_or(text.len());
            MatchCandidate {
                source: pattern.source,
                priority,
                span: marker.label_start..content_end,
                label: marker.label.to_string(),
                key: normalize_key(marker.label),
                captured: text[marker.content_start..content_end].trim().to_string(),
            }
        })
        .collect()
}

pub fn resolve<P: PatternSource>(
    mut candidates: Vec<MatchCandidate<P>>,
    mode: DedupeMode,
) -> Vec<MatchCandidate<P>> {
    candidates.sort_by_key(|candidate| (candidate.priority, candidate.span.start));

    match mode {
        DedupeMode::KeepAll => candidates,
        DedupeMode::Priority => {
            let mut seen_keys = HashSet::new();
            let mut accepted: Vec<MatchCandidate<P>> = Vec::new();

            for candidate in candidates {
                if accepted
                    .iter()
                    .any(|existing| spans_overlap(&existing.span, &candidate.span))
                {
                    continue;
                }
                // Numbering that restarts per section repeats keys in disjoint spans.
                if !seen_keys.insert(candidate.key.clone()) {
                    warn!(
                        pattern = candidate.source.as_str(),
                        label = %candidate.label,
                        offset = candidate.span.start,
                        "marker label repeats in a separate span; keeping both"
                    );
                }
                accepted.push(candidate);
            }

            accepted.sort_by_key(|candidate| candidate.span.start);
            accepted
        }
        DedupeMode::Longest => {
            let mut best_by_key = HashMap::<String, usize>::new();
            let mut best: Vec<MatchCandidate<P>> = Vec::new();

            for candidate in candidates {
                match best_by_key.get(&candidate.key) {
                    Some(&index) => {
                        if candidate.captured.chars().count() > best[index].captured.chars().count()
                        {
                            best[index] = candidate;
                        }
                    }
                    None => {
                        best_by_key.insert(candidate.key.clone(), best.len());
                        best.push(candidate);
                    }
                }
            }

            best.sort_by_key(|candidate| candidate.span.start);
            best
        }
    }
}

fn spans_overlap(left: &Range<usize>, right: &Range<usize>) -> bool {
    left.start < right.end && right.start < left.end
}
