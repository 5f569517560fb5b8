use crate::models::Language;

pub const TITLE_PLACEHOLDER: &str = "{PROBLEM_TITLE}";
pub const DATE_PLACEHOLDER: &str = "{PROBLEM_DATE}";

const README_TEMPLATE: &str = "# {PROBLEM_TITLE}\n\n**Date:** {PROBLEM_DATE}\n";

const PYTHON_SOURCE_TEMPLATE: &str = r#""""{PROBLEM_TITLE} - {PROBLEM_DATE}"""


def solution():
    """
    TODO: Implement solution here

    Args:
        Add your arguments here

    Returns:
        Add your return type here
    """
    pass
"#;

const PYTHON_TEST_TEMPLATE: &str = r#""""Tests for {PROBLEM_TITLE} - {PROBLEM_DATE}"""

from main import *


def test_answer():
    """
    TODO: Add test cases here

    Example:
    input_output = [
        {
            'input': {
                'arg1': value1,
                'arg2': value2
            },
            'output': expected_output
        }
    ]
    for i in input_output:
        assert solution(**i['input']) == i['output']
    """
    pass
"#;

const RUST_SOURCE_TEMPLATE: &str = r#"// {PROBLEM_TITLE} - {PROBLEM_DATE}

fn solution() {
    todo!()
}

fn main() {
    solution();
}
"#;

const RUST_TEST_TEMPLATE: &str = r#"// Tests for {PROBLEM_TITLE} - {PROBLEM_DATE}
//
// TODO: Add test cases here

#[test]
fn test_answer() {
    todo!()
}
"#;

/// The three templates a workspace is generated from. Loaded once at
/// generator construction, read-only after.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub readme: String,
    pub source: String,
    pub test: String,
}

impl TemplateSet {
    pub fn for_language(language: Language) -> Self {
        let (source, test) = match language {
            Language::Py => (PYTHON_SOURCE_TEMPLATE, PYTHON_TEST_TEMPLATE),
            Language::Rs => (RUST_SOURCE_TEMPLATE, RUST_TEST_TEMPLATE),
        };
        Self {
            readme: README_TEMPLATE.to_string(),
            source: source.to_string(),
            test: test.to_string(),
        }
    }
}

/// Literal placeholder substitution. Order-independent, no escaping;
/// unrecognized `{...}` tokens stay verbatim.
pub fn substitute(template: &str, title: &str, date: &str) -> String {
    template
        .replace(TITLE_PLACEHOLDER, title)
        .replace(DATE_PLACEHOLDER, date)
}
