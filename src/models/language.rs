use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Py,
    Rs,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Py => "Python",
            Language::Rs => "Rust",
        }
    }

    /// Name of the workspace subdirectory holding the stubs.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Language::Py => "python",
            Language::Rs => "rust",
        }
    }

    pub fn source_file(&self) -> &'static str {
        match self {
            Language::Py => "main.py",
            Language::Rs => "main.rs",
        }
    }

    pub fn test_file(&self) -> &'static str {
        match self {
            Language::Py => "test.py",
            Language::Rs => "test.rs",
        }
    }
}
