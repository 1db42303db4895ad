use crate::url::extract_domain;
use std::collections::HashSet;

/// Most common English words, matched against a bounded word sample
const COMMON_ENGLISH_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see",
    "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "about",
    "after", "again", "also", "been", "before", "being", "between", "both", "called", "came",
    "come", "could", "each", "find", "first", "from", "good", "great", "have", "here", "into",
    "just", "know", "like", "long", "look", "make", "many", "more", "most", "move", "much",
    "must", "name", "need", "number", "only", "other", "over", "part", "place", "right", "same",
    "should", "show", "since", "some", "such", "take", "than", "that", "their", "them", "there",
    "these", "they", "thing", "think", "this", "those", "through", "time", "under", "very",
    "want", "water", "well", "were", "what", "where", "which", "while", "will", "with", "work",
    "would", "write", "year", "your",
];

/// Code-point ranges for scripts that never appear in English prose
const NON_LATIN_RANGES: &[(u32, u32)] = &[
    (0x4e00, 0x9fff), // CJK Unified Ideographs
    (0x3040, 0x309f), // Hiragana
    (0x30a0, 0x30ff), // Katakana
    (0x0600, 0x06ff), // Arabic
    (0x0400, 0x04ff), // Cyrillic
    (0x0590, 0x05ff), // Hebrew
    (0x0e00, 0x0e7f), // Thai
    (0x0900, 0x097f), // Devanagari
    (0x0980, 0x09ff), // Bengali
    (0x0a00, 0x0a7f), // Gurmukhi
    (0x0a80, 0x0aff), // Gujarati
    (0x0b00, 0x0b7f), // Oriya
    (0x0b80, 0x0bff), // Tamil
    (0x0c00, 0x0c7f), // Telugu
    (0x0c80, 0x0cff), // Kannada
    (0x0d00, 0x0d7f), // Malayalam
    (0x1100, 0x11ff), // Hangul Jamo
    (0xac00, 0xd7a3), // Hangul Syllables
];

/// Public-suffix hints for predominantly English-speaking registries
const ENGLISH_TLDS: &[&str] = &[
    ".com", ".org", ".net", ".edu", ".gov", ".uk", ".us", ".ca", ".au", ".nz", ".ie", ".za",
    ".in",
];

/// Well-known English-language sites worth trusting outright
const ENGLISH_SITES: &[&str] = &[
    "wikipedia.org",
    "github.com",
    "stackoverflow.com",
    "medium.com",
    "reddit.com",
    "youtube.com",
    "mozilla.org",
    "w3schools.com",
    "geeksforgeeks.org",
];

/// Upper bound on the extracted text sample, in characters
const TEXT_SAMPLE_CHARS: usize = 1000;

/// Minimum text sample length worth analyzing at all
const MIN_TEXT_CHARS: usize = 50;

/// Maximum words inspected by the common-word ratio check
const MAX_SAMPLE_WORDS: usize = 100;

/// Accept when at least this fraction of sampled words is common English
const WORD_RATIO_THRESHOLD: f32 = 0.30;

/// Reject when more than this fraction of sampled characters is non-Latin
const SCRIPT_FRACTION_THRESHOLD: f32 = 0.10;

/// Heuristic English-content gate, run once per fetched page
///
/// The matching tables are owned by the instance and injected at construction,
/// so tests can swap in alternate word lists or script ranges without touching
/// process-wide state. [`LanguageDetector::new`] wires in the default tables.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    common_words: HashSet<String>,
    non_latin_ranges: Vec<(u32, u32)>,
    english_tlds: Vec<String>,
    english_sites: Vec<String>,
}

impl LanguageDetector {
    /// Creates a detector with the built-in tables
    pub fn new() -> Self {
        Self {
            common_words: COMMON_ENGLISH_WORDS.iter().map(|w| w.to_string()).collect(),
            non_latin_ranges: NON_LATIN_RANGES.to_vec(),
            english_tlds: ENGLISH_TLDS.iter().map(|t| t.to_string()).collect(),
            english_sites: ENGLISH_SITES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Creates a detector with caller-supplied word and script tables
    ///
    /// Domain heuristics keep the built-in tables; only the content-analysis
    /// tables are replaced.
    pub fn with_tables(
        common_words: HashSet<String>,
        non_latin_ranges: Vec<(u32, u32)>,
    ) -> Self {
        Self {
            common_words,
            non_latin_ranges,
            ..Self::new()
        }
    }

    /// Decides whether fetched HTML is English content
    ///
    /// Three signals, cheapest first:
    ///
    /// 1. An HTML `lang` attribute is trusted directly when present
    /// 2. A bounded sample of extracted text is scanned for non-Latin scripts;
    ///    the page is rejected when their fraction exceeds the threshold
    /// 3. The first ~100 words are matched against the common-English word
    ///    set; the page is accepted when the ratio clears the threshold
    ///
    /// Pages with less than [`MIN_TEXT_CHARS`] of extractable text are
    /// rejected: there is nothing to index either way.
    pub fn is_english_content(&self, html: &str, _url: &str) -> bool {
        if let Some(lang) = extract_html_lang(html) {
            return lang.starts_with("en");
        }

        let text = extract_text_sample(html, TEXT_SAMPLE_CHARS);

        if self.non_latin_fraction(&text) > SCRIPT_FRACTION_THRESHOLD {
            return false;
        }

        if text.len() < MIN_TEXT_CHARS {
            return false;
        }

        self.english_word_ratio(&text) > WORD_RATIO_THRESHOLD
    }

    /// Pre-fetch fast path: guesses language from the domain name alone
    ///
    /// Lets the caller skip the fetch entirely for domains that are very
    /// unlikely to serve English content. A `false` here means "no signal",
    /// not "non-English".
    pub fn is_english_domain(&self, url: &str) -> bool {
        let domain = extract_domain(url);
        if domain.is_empty() {
            return false;
        }

        for site in &self.english_sites {
            if domain == *site || domain.ends_with(&format!(".{}", site)) {
                return true;
            }
        }

        self.english_tlds.iter().any(|tld| domain.ends_with(tld))
    }

    /// Fraction of sampled characters falling in non-Latin script ranges
    fn non_latin_fraction(&self, text: &str) -> f32 {
        let mut total = 0u32;
        let mut non_latin = 0u32;

        for ch in text.chars() {
            if ch.is_whitespace() {
                continue;
            }
            total += 1;
            let cp = ch as u32;
            if self
                .non_latin_ranges
                .iter()
                .any(|&(lo, hi)| cp >= lo && cp <= hi)
            {
                non_latin += 1;
            }
        }

        if total == 0 {
            0.0
        } else {
            non_latin as f32 / total as f32
        }
    }

    /// Ratio of common English words within the bounded word sample
    fn english_word_ratio(&self, text: &str) -> f32 {
        let mut total = 0u32;
        let mut english = 0u32;

        for word in text.split_whitespace() {
            if total as usize >= MAX_SAMPLE_WORDS {
                break;
            }

            let clean: String = word
                .chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(|c| c.to_lowercase())
                .collect();

            // Very short tokens carry no signal
            if clean.len() < 2 {
                continue;
            }

            total += 1;
            if self.common_words.contains(&clean) {
                english += 1;
            }
        }

        if total == 0 {
            0.0
        } else {
            english as f32 / total as f32
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the `lang` attribute value from the `<html>` tag, lowercased
///
/// Hand-scanned rather than parsed: the attribute sits in the first tag of the
/// document and a full parse would blow the per-page latency budget.
pub fn extract_html_lang(html: &str) -> Option<String> {
    let tag_start = html.find("<html")?;
    let tag_end = html[tag_start..].find('>')? + tag_start;
    let tag = &html[tag_start..tag_end];

    let lang_pos = tag.find("lang")?;
    let eq_pos = tag[lang_pos..].find('=')? + lang_pos;

    let rest = tag[eq_pos + 1..].trim_start();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }

    let value = &rest[1..];
    let close = value.find(quote)?;
    let lang = value[..close].to_lowercase();
    if lang.is_empty() {
        None
    } else {
        Some(lang)
    }
}

/// Extracts up to `max_chars` of visible text from HTML
///
/// Skips markup plus `<script>` and `<style>` bodies; punctuation is replaced
/// with spaces so the word splitter sees clean tokens.
fn extract_text_sample(html: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(max_chars.min(html.len()));
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;
    let mut tag_start = 0usize;

    for (i, c) in html.char_indices() {
        if text.len() >= max_chars {
            break;
        }

        match c {
            '<' => {
                in_tag = true;
                tag_start = i;
            }
            '>' if in_tag => {
                in_tag = false;
                let tag = &html[tag_start..i];
                if tag.starts_with("<script") {
                    in_script = true;
                } else if tag.starts_with("</script") {
                    in_script = false;
                } else if tag.starts_with("<style") {
                    in_style = true;
                } else if tag.starts_with("</style") {
                    in_style = false;
                }
            }
            _ if !in_tag && !in_script && !in_style => {
                if c.is_alphanumeric() || c.is_whitespace() {
                    text.push(c);
                } else {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }

    text
}
