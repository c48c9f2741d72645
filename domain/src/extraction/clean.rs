//! Chain-of-thought stripping for debate turns
//!
//! Debate models are asked to act in character, so their output often mixes
//! the actual reply with planning notes ("I need to play the persona...",
//! "for example: ..."). [`clean`] keeps only the reply. An empty result means
//! the turn has no usable content.

use regex::Regex;
use std::sync::LazyLock;

static SCRATCHPAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think(?:ing)?>.*?</think(?:ing)?>").unwrap());

/// Final-answer markers in priority order; the first kind that occurs wins.
static FINAL_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"所以最终发言应该是[：:]\s*",
        r"所以组合起来[：:]\s*",
        r"最终发言[：:]\s*",
        r"最终[：:]\s*",
        r"(?i)\bso my final (?:reply|answer) (?:is|would be)\s*[:：]\s*",
        r"(?i)\bfinal (?:reply|answer)\s*[:：]\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Draft markers; the latest occurrence of any of them wins.
static DRAFT_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"比如[：:]\s*",
        r"或者[：:]\s*",
        r"或者更符合人设[：:]\s*",
        r"(?i)\bfor example\s*[:：]\s*",
        r"(?i)\bor\s*[:：]\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const META_OPENERS: &[&str] = &["我", "用户"];
const ROLE_WORDS: &[&str] = &["扮演", "人设"];

const META_KEYWORDS: &[&str] = &[
    "人设", "扮演", "口头禅", "首先", "然后", "用户", "需要我", "对话", "观点", "反驳", "支持",
    "要注意", "比如", "或者",
];

static EN_META_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:i\b|i'm\b|i am\b|as\b|the user\b)").unwrap()
});

static EN_ROLE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:persona|role-?play|in character|my role|play the role)\b").unwrap()
});

static EN_META_KEYWORDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        "persona",
        "first",
        "then",
        "the user",
        "rebuttal",
        "rebut",
        "catchphrase",
        "need to",
        "should",
        "stance",
        "in character",
        "for example",
    ]
    .iter()
    .map(|k| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(k))).unwrap())
    .collect()
});

/// Hits needed for a line to count as meta-commentary
const META_HIT_THRESHOLD: usize = 3;

/// Strip leaked reasoning. Idempotent: `clean(clean(x)) == clean(x)`.
pub fn clean(raw: &str) -> String {
    let mut current = clean_once(raw);
    loop {
        let next = clean_once(&current);
        // Every non-identity pass removes text, so this terminates.
        if next == current || next.len() >= current.len() {
            return current;
        }
        current = next;
    }
}

/// A single cleaning pass.
pub fn clean_once(raw: &str) -> String {
    let stripped = SCRATCHPAD.replace_all(raw, "");
    let focused = after_final_marker(&stripped)
        .or_else(|| after_draft_marker(&stripped))
        .unwrap_or(&stripped);

    focused
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_reasoning_leak(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn after_final_marker(text: &str) -> Option<&str> {
    FINAL_MARKERS
        .iter()
        .find_map(|marker| marker.find_iter(text).last())
        .map(|m| &text[m.end()..])
}

fn after_draft_marker(text: &str) -> Option<&str> {
    DRAFT_MARKERS
        .iter()
        .filter_map(|marker| marker.find_iter(text).last())
        .map(|m| m.end())
        .max()
        .map(|end| &text[end..])
}

/// Whether a (trimmed, non-empty) line is planning chatter rather than a reply
pub fn is_reasoning_leak(line: &str) -> bool {
    let opener = META_OPENERS.iter().any(|o| line.starts_with(o))
        && ROLE_WORDS.iter().any(|w| line.contains(w));
    if opener {
        return true;
    }

    let en_opener = EN_META_OPENER.is_match(line) && EN_ROLE_WORD.is_match(line);
    if en_opener {
        return true;
    }

    let hits = META_KEYWORDS.iter().filter(|k| line.contains(*k)).count()
        + EN_META_KEYWORDS.iter().filter(|k| k.is_match(line)).count();
    hits >= META_HIT_THRESHOLD
}
