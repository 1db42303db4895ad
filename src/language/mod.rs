//! Fast language gating for fetched content
//!
//! Full statistical language identification is far too slow to run at crawl
//! throughput, so this module layers cheap heuristics instead: an HTML `lang`
//! attribute check, a non-Latin script scan, and a common-word ratio over a
//! bounded text sample. The gate trades some recall for latency headroom and
//! stays under a millisecond per page.

mod detector;

pub use detector::{extract_html_lang, LanguageDetector};
