//! Model id normalization for price lookups.
//!
//! Candidates are tried in a fixed order: the id itself, then the id with
//! `-latest`, `-preview`, a date snapshot, or a trailing version removed.
//! Each rule applies to the original id, never to a previous candidate.

use std::sync::OnceLock;

use regex::Regex;

fn date_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\d{4}-?\d{2}-?\d{2}$").expect("valid date suffix regex"))
}

fn version_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-(v?\d+|0\d{2,})$").expect("valid version suffix regex"))
}

pub fn candidates(model: &str) -> Vec<String> {
    let mut out = vec![model.to_string()];

    if let Some(stripped) = model.strip_suffix("-latest") {
        out.push(stripped.to_string());
    }

    if let Some(stripped) = model.strip_suffix("-preview") {
        out.push(stripped.to_string());
    }

    if date_suffix_regex().is_match(model) {
        out.push(date_suffix_regex().replace(model, "").into_owned());
    }

    if version_suffix_regex().is_match(model) {
        out.push(version_suffix_regex().replace(model, "").into_owned());
    }

    out
}
