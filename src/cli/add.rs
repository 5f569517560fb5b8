use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{ArgGroup, Args};

use crate::config;
use crate::email::{self, RawInput};
use crate::error::{Error, Result};
use crate::extract::{Extraction, Extractor};
use crate::generate::Generator;
use crate::models::{Language, ProblemRecord};

const PREVIEW_CHARS: usize = 500;

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["email", "text", "stdin"])))]
pub struct AddArgs {
    /// Path to an email file (.eml format)
    #[arg(long)]
    pub email: Option<PathBuf>,
    /// Path to a text file containing the problem description
    #[arg(long)]
    pub text: Option<PathBuf>,
    /// Read the problem description from stdin
    #[arg(long)]
    pub stdin: bool,
    /// Date for the problem in YYYY-MM-DD format (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Stub language for the workspace
    #[arg(long, value_enum)]
    pub language: Option<Language>,
    /// Path to the problems directory
    #[arg(long)]
    pub problems_dir: Option<PathBuf>,
    /// Replace an existing workspace for the same date
    #[arg(long)]
    pub force: bool,
}

pub fn add_problem(args: AddArgs) {
    let user_config = config::load_config();
    let language = args.language.unwrap_or(user_config.language);
    let problems_dir = args
        .problems_dir
        .clone()
        .unwrap_or(user_config.problems_dir);

    let input = match read_input(&args) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let body = match email::normalize(input) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let extraction = match Extractor::new().extract(&body) {
        Ok(extraction) => extraction,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    print_parsed_info(&extraction);

    let record = match ProblemRecord::build(
        extraction.company,
        extraction.difficulty,
        extraction.description,
        args.date.as_deref(),
    ) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let generator = Generator::new(&problems_dir, language);
    let result = if args.force {
        generator.generate_overwrite(&record)
    } else {
        generator.generate(&record)
    };

    match result {
        Ok(path) => {
            println!();
            println!("Created problem at: {}", path.display());
            println!();
            println!("Created files:");
            println!("  - {}/readme.md", path.display());
            println!(
                "  - {}/{}/{}",
                path.display(),
                language.dir_name(),
                language.source_file()
            );
            println!(
                "  - {}/{}/{}",
                path.display(),
                language.dir_name(),
                language.test_file()
            );
            println!();
            println!("Next steps:");
            println!("  1. Review the problem description in readme.md");
            println!(
                "  2. Implement the solution in {}/{}",
                language.dir_name(),
                language.source_file()
            );
            println!(
                "  3. Add test cases in {}/{}",
                language.dir_name(),
                language.test_file()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if matches!(e, Error::WorkspaceExists(_)) {
                eprintln!("The problem directory for this date already exists.");
                eprintln!("Re-run with --force to replace it.");
            }
            std::process::exit(1);
        }
    }
}

fn read_input(args: &AddArgs) -> Result<RawInput> {
    if let Some(path) = &args.email {
        println!("Parsing email file: {}", path.display());
        Ok(RawInput::Email(fs::read_to_string(path)?))
    } else if let Some(path) = &args.text {
        println!("Parsing text file: {}", path.display());
        Ok(RawInput::Text(fs::read_to_string(path)?))
    } else {
        println!("Reading from stdin...");
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(RawInput::Text(buf))
    }
}

fn print_parsed_info(extraction: &Extraction) {
    println!();
    println!("{}", "=".repeat(60));
    println!("  PARSED PROBLEM INFORMATION");
    println!("{}", "=".repeat(60));
    if let Some(company) = &extraction.company {
        println!("Company: {}", company);
    }
    if let Some(difficulty) = extraction.difficulty {
        println!("Difficulty: {}", difficulty.display_name());
    }
    println!();
    println!("{}", "-".repeat(60));
    if extraction.description.chars().count() > PREVIEW_CHARS {
        let preview: String = extraction.description.chars().take(PREVIEW_CHARS).collect();
        println!("{}", preview);
        println!("... (truncated)");
    } else {
        println!("{}", extraction.description);
    }
    println!("{}", "-".repeat(60));
}
