//! Response extraction
//!
//! Recovers structured verdicts from noisy model text ([`extract`]) and strips
//! leaked reasoning from debate output ([`clean`]).
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`strategy`] | Ordered extraction strategies (direct, fenced, brace scan, field regex) |
//! | [`schema`] | Interprets a decoded object as a score card or a choice |
//! | [`clean`] | Chain-of-thought stripper for debate turns |

pub mod clean;
pub mod schema;
pub mod strategy;

pub use clean::{clean, clean_once};
pub use schema::{ExpectedShape, ParsedOutcome};
pub use strategy::{
    BalancedBrace, DirectJson, ExtractionStrategy, Extractor, FencedBlock, FieldRegex,
    ParsedResult, extract, extract_monologue,
};
