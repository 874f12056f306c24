use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::types::FilterDecision;
use crate::{Error, Result};

fn email_pattern() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").unwrap())
}

/// Pull the first embedded email address out of a free-form attendee string
/// such as `"Jane Doe <jane@acme.com>"`, lower-cased. Absence is normal and
/// returns `None`, never an error.
pub fn extract_email(raw: &str) -> Option<String> {
    email_pattern()
        .find(raw)
        .map(|m| m.as_str().to_lowercase())
}

/// Compiled skip rules, built once per invocation from the raw settings.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub skip_titles: Vec<String>,
    pub internal_domains: Vec<String>,
    vc_patterns: Vec<Regex>,
}

impl FilterConfig {
    pub fn new(
        skip_titles: Vec<String>,
        internal_domains: Vec<String>,
        vc_patterns: &[String],
    ) -> Result<Self> {
        let vc_patterns = vc_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| Error::Config(format!("Invalid VC pattern {p:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            skip_titles,
            internal_domains,
            vc_patterns,
        })
    }

}

/// Decide whether a meeting should be excluded from storage and
/// summarization. Rules run in strict priority order and the first match
/// wins: title substring, all attendees internal, VC domain pattern.
pub fn evaluate(title: &str, attendees: &[String], config: &FilterConfig) -> FilterDecision {
    let title_lower = title.to_lowercase();
    for skip_title in &config.skip_titles {
        if title_lower.contains(&skip_title.to_lowercase()) {
            return FilterDecision::skip(format!("Title matches skip pattern: {skip_title}"));
        }
    }

    if !attendees.is_empty() && all_internal(attendees, &config.internal_domains) {
        return FilterDecision::skip("All attendees are internal");
    }

    if !attendees.is_empty() && is_vc_meeting(attendees, &config.vc_patterns) {
        return FilterDecision::skip("Meeting appears to be with VCs");
    }

    FilterDecision::keep()
}

/// True when every extractable attendee email ends with an internal domain
/// suffix. Requires at least one email to have been extracted: an attendee
/// list that yields no emails at all must not be mistaken for "all internal".
fn all_internal(attendees: &[String], internal_domains: &[String]) -> bool {
    let mut found_any_email = false;

    for attendee in attendees {
        let Some(email) = extract_email(attendee) else {
            continue;
        };

        found_any_email = true;
        let is_internal = internal_domains
            .iter()
            .any(|domain| email.ends_with(&domain.to_lowercase()));
        if !is_internal {
            return false;
        }
    }

    found_any_email
}

fn is_vc_meeting(attendees: &[String], vc_patterns: &[Regex]) -> bool {
    attendees
        .iter()
        .filter_map(|attendee| extract_email(attendee))
        .any(|email| vc_patterns.iter().any(|pattern| pattern.is_match(&email)))
}
