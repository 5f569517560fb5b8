use chrono::{Local, NaiveDate};

use crate::error::{Error, Result};
use super::difficulty::Difficulty;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One extracted problem, ready for generation. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct ProblemRecord {
    pub date: NaiveDate,
    pub description: String,
    pub company: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl ProblemRecord {
    /// Assemble a record from extracted fields. A missing `date` defaults
    /// to the current processing day.
    pub fn build(
        company: Option<String>,
        difficulty: Option<Difficulty>,
        description: String,
        date: Option<&str>,
    ) -> Result<Self> {
        let date = match date {
            Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|_| Error::InvalidDate(s.to_string()))?,
            None => Local::now().date_naive(),
        };

        Ok(Self {
            date,
            description,
            company,
            difficulty,
        })
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
