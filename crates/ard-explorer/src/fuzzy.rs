use serde::{Deserialize, Serialize};

/// A needle longer than a candidate by more than this never matches it.
pub const DEFAULT_MAX_LENGTH_DIFFERENCE: usize = 3;

/// Penalty applied when the candidate does not contain the needle, and again when it does not
/// start with it.
const MISS_PENALTY: usize = 1000;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuzzyMatchStrategy {
    Exact,
    IgnoreCase,
    /// Case insensitive. The needle is compared against every window of the candidate with the
    /// same length, so long candidates are not penalized for their extra characters.
    #[default]
    IgnoreCaseAndLength,
}

/// Edit distance between two strings, in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}

/// Distance between `candidate` and `needle` under `strategy`.
pub fn fuzzy_distance(candidate: &str, needle: &str, strategy: FuzzyMatchStrategy) -> usize {
    match strategy {
        FuzzyMatchStrategy::Exact => levenshtein(candidate, needle),
        FuzzyMatchStrategy::IgnoreCase => {
            levenshtein(&candidate.to_lowercase(), &needle.to_lowercase())
        }
        FuzzyMatchStrategy::IgnoreCaseAndLength => {
            let candidate: Vec<char> = candidate.to_lowercase().chars().collect();
            let needle = needle.to_lowercase();
            let width = needle.chars().count();

            if candidate.len() <= width {
                let candidate: String = candidate.into_iter().collect();
                return levenshtein(&candidate, &needle);
            }

            candidate
                .windows(width.max(1))
                .map(|window| levenshtein(&window.iter().collect::<String>(), &needle))
                .min()
                .unwrap_or(width)
        }
    }
}

/// Items whose text is close to `needle`, best match first.
///
/// A candidate matches when it contains the needle, or when its distance is at most half the
/// needle's length. Candidates that do not contain the needle, or do not start with it, are
/// ranked below those that do. Ties are broken by the shorter candidate.
pub fn fuzzy_matches<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    needle: &str,
    selector: impl Fn(&T) -> &str,
    strategy: FuzzyMatchStrategy,
    max_length_difference: usize,
) -> Vec<&'a T>
where
    T: 'a,
{
    let needle_len = needle.chars().count();
    let max_distance = needle_len / 2;

    let mut matches: Vec<(&T, usize, usize)> = items
        .into_iter()
        .filter_map(|item| {
            let candidate = selector(item);
            let candidate_len = candidate.chars().count();
            if needle_len.saturating_sub(candidate_len) > max_length_difference {
                return None;
            }

            let contains = candidate.contains(needle);
            let distance = fuzzy_distance(candidate, needle, strategy);
            if distance > max_distance && !contains {
                return None;
            }

            let starts_with = candidate.starts_with(needle);
            let penalty = (if contains { 1 } else { MISS_PENALTY })
                * (if starts_with { 1 } else { MISS_PENALTY });
            Some((item, candidate_len, distance * penalty))
        })
        .collect();

    matches.sort_by_key(|(_, len, distance)| (*distance, *len));
    matches.into_iter().map(|(item, _, _)| item).collect()
}
