use regex::Regex;

use crate::error::{Error, Result};
use crate::models::Difficulty;

/// Company attribution patterns, checked in order; the first matching
/// rule wins. The capture stops at punctuation or line end.
const COMPANY_PATTERNS: [&str; 3] = [
    r"This problem was asked by ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
    r"This problem was recently asked by ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
    r"Asked by ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
];

/// Header/footer lines carrying any of these are not problem text.
const NOISE_MARKERS: [&str; 5] = [
    "good morning",
    "good evening",
    "unsubscribe",
    "daily coding problem",
    "upgrade to premium",
];

/// A line containing one of these starts the problem body.
const PROBLEM_CUES: [&str; 6] = [
    "this problem was asked",
    "given",
    "return",
    "find",
    "implement",
    "write",
];

/// Below this, line filtering is assumed to have eaten the problem and the
/// whole text is used instead.
const MIN_DESCRIPTION_LEN: usize = 50;

/// Fields pulled out of one normalized problem text.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub company: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub description: String,
}

pub struct Extractor {
    company_rules: Vec<Regex>,
    blank_runs: Regex,
    space_runs: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        let company_rules = COMPANY_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern).expect("company pattern must compile"))
            .collect();
        Self {
            company_rules,
            blank_runs: Regex::new(r"\n\s*\n").expect("blank-run pattern must compile"),
            space_runs: Regex::new(r" +").expect("space-run pattern must compile"),
        }
    }

    /// Pull company, difficulty, and the residual description out of a
    /// plain-text body. Missing company/difficulty is not an error; an
    /// empty body is.
    pub fn extract(&self, text: &str) -> Result<Extraction> {
        let cleaned = self.clean_text(text);
        if cleaned.is_empty() {
            return Err(Error::EmptyInput);
        }

        Ok(Extraction {
            company: self.extract_company(&cleaned),
            difficulty: extract_difficulty(&cleaned),
            description: self.extract_description(&cleaned),
        })
    }

    fn clean_text(&self, text: &str) -> String {
        let collapsed = self.blank_runs.replace_all(text, "\n\n");
        self.space_runs
            .replace_all(&collapsed, " ")
            .trim()
            .to_string()
    }

    fn extract_company(&self, text: &str) -> Option<String> {
        self.company_rules
            .iter()
            .find_map(|rule| rule.captures(text).map(|caps| caps[1].to_string()))
    }

    /// The problem body: noise lines (greetings, footers) and lines that
    /// are nothing but a company attribution or a difficulty marker are
    /// dropped; capture starts at the first problem cue.
    fn extract_description(&self, text: &str) -> String {
        let mut captured: Vec<&str> = Vec::new();
        let mut in_problem = false;

        for line in text.lines() {
            let lower = line.trim().to_lowercase();

            if NOISE_MARKERS.iter().any(|marker| lower.contains(marker)) {
                if in_problem {
                    // Footer reached.
                    break;
                }
                continue;
            }
            if lower.is_empty() || self.is_attribution_line(line) || is_difficulty_line(&lower) {
                continue;
            }
            if in_problem || PROBLEM_CUES.iter().any(|cue| lower.contains(cue)) {
                in_problem = true;
                captured.push(line);
            }
        }

        let description = captured.join("\n").trim().to_string();
        if description.len() < MIN_DESCRIPTION_LEN {
            return text.to_string();
        }
        description
    }

    /// True when the whole line is a company attribution, with nothing but
    /// punctuation left over.
    fn is_attribution_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        self.company_rules.iter().any(|rule| {
            rule.find(trimmed).is_some_and(|m| {
                m.start() == 0
                    && trimmed[m.end()..]
                        .chars()
                        .all(|c| c.is_ascii_punctuation() || c.is_whitespace())
            })
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Earliest difficulty token by position wins. Matching is plain substring,
/// so "medium-rare" counts as medium.
fn extract_difficulty(text: &str) -> Option<Difficulty> {
    let lower = text.to_lowercase();
    Difficulty::ALL
        .iter()
        .filter_map(|level| lower.find(level.as_str()).map(|pos| (pos, *level)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, level)| level)
}

/// "hard", "Hard:", "Difficulty: Medium" and the like.
fn is_difficulty_line(lower: &str) -> bool {
    let rest = lower
        .strip_prefix("difficulty:")
        .map(str::trim)
        .unwrap_or(lower);
    let rest = rest.trim_end_matches(|c: char| c.is_ascii_punctuation());
    Difficulty::ALL.iter().any(|level| rest == level.as_str())
}
