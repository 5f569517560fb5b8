use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{Language, ProblemRecord};
use crate::template::{substitute, TemplateSet};

/// Readme title when no company was extracted.
pub const FALLBACK_TITLE: &str = "Daily Problem";

/// Directory name under the `YYYY_MMDD` convention.
pub fn directory_name(date: NaiveDate) -> String {
    date.format("%Y_%m%d").to_string()
}

/// Materializes problem workspaces under a base path.
pub struct Generator {
    base_path: PathBuf,
    language: Language,
    templates: TemplateSet,
}

impl Generator {
    pub fn new(base_path: impl Into<PathBuf>, language: Language) -> Self {
        Self {
            base_path: base_path.into(),
            language,
            templates: TemplateSet::for_language(language),
        }
    }

    /// Create the workspace for `record`. Refuses to touch an existing
    /// workspace: the existence check runs before any mutation.
    pub fn generate(&self, record: &ProblemRecord) -> Result<PathBuf> {
        let dir = self.base_path.join(directory_name(record.date));
        if dir.exists() {
            return Err(Error::WorkspaceExists(dir));
        }
        self.write_workspace(&dir, record)
    }

    /// The explicit overwrite variant: removes an existing workspace for
    /// the same date, then generates. Never the default.
    pub fn generate_overwrite(&self, record: &ProblemRecord) -> Result<PathBuf> {
        let dir = self.base_path.join(directory_name(record.date));
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        self.write_workspace(&dir, record)
    }

    fn write_workspace(&self, dir: &Path, record: &ProblemRecord) -> Result<PathBuf> {
        if let Err(e) = self.try_write(dir, record) {
            // Best-effort cleanup of the partial workspace; the original
            // error is the one reported.
            let _ = fs::remove_dir_all(dir);
            return Err(e);
        }
        Ok(dir.to_path_buf())
    }

    fn try_write(&self, dir: &Path, record: &ProblemRecord) -> Result<()> {
        let title = record.company.as_deref().unwrap_or(FALLBACK_TITLE);
        let date = record.formatted_date();

        let lang_dir = dir.join(self.language.dir_name());
        fs::create_dir_all(&lang_dir)?;

        fs::write(dir.join("readme.md"), self.render_readme(record, title, &date))?;
        fs::write(
            lang_dir.join(self.language.source_file()),
            substitute(&self.templates.source, title, &date),
        )?;
        fs::write(
            lang_dir.join(self.language.test_file()),
            substitute(&self.templates.test, title, &date),
        )?;
        Ok(())
    }

    fn render_readme(&self, record: &ProblemRecord, title: &str, date: &str) -> String {
        let mut content = substitute(&self.templates.readme, title, date);
        if !content.ends_with('\n') {
            content.push('\n');
        }
        if let Some(difficulty) = record.difficulty {
            content.push_str(&format!("\n**Difficulty:** {}\n", difficulty.display_name()));
        }
        if let Some(company) = &record.company {
            content.push_str(&format!("\n**Asked by:** {}\n", company));
        }
        content.push('\n');
        content.push_str(&record.description);
        content.push('\n');
        content
    }
}
