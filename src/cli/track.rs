use std::fs;
use std::path::{Path, PathBuf};

use crate::config;
use crate::tracking::TrackingStore;
use super::TrackCommands;

const TRACKING_FILE: &str = "problem_tracking.json";

pub fn run(command: TrackCommands) {
    match command {
        TrackCommands::List { problems_dir } => {
            let (problems_dir, tracking_file) = resolve_paths(problems_dir);
            list_problems(&problems_dir, &tracking_file);
        }
        TrackCommands::Add {
            directory,
            number,
            problems_dir,
        } => {
            let (problems_dir, tracking_file) = resolve_paths(problems_dir);
            add_number(&directory, number, &problems_dir, &tracking_file);
        }
        TrackCommands::Untracked { problems_dir } => {
            let (problems_dir, tracking_file) = resolve_paths(problems_dir);
            show_untracked(&problems_dir, &tracking_file);
        }
    }
}

/// The tracking file sits next to the problems directory.
fn resolve_paths(problems_dir: Option<PathBuf>) -> (PathBuf, PathBuf) {
    let problems_dir = problems_dir.unwrap_or_else(|| config::load_config().problems_dir);
    let root = match problems_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (problems_dir, root.join(TRACKING_FILE))
}

fn load_store(tracking_file: &Path) -> TrackingStore {
    match TrackingStore::load(tracking_file) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn list_problems(problems_dir: &Path, tracking_file: &Path) {
    let store = load_store(tracking_file);
    let dirs = problem_directories(problems_dir);

    if dirs.is_empty() {
        println!("No problems found in {}", problems_dir.display());
        return;
    }

    println!("Found {} problem(s):", dirs.len());
    println!();

    for dir_name in &dirs {
        let (title, company) = readme_summary(&problems_dir.join(dir_name).join("readme.md"));
        let number = match store.get(dir_name) {
            Some(n) => format!("DCP #{}", n),
            None => "DCP #???".to_string(),
        };
        let company_str = company
            .map(|c| format!(" (by {})", c))
            .unwrap_or_default();
        println!("  [{}] {} - {}{}", number, dir_name, title, company_str);
    }

    println!();
    println!("Add a number with: dcp track add <directory> <number>");
}

fn add_number(directory: &str, number: u32, problems_dir: &Path, tracking_file: &Path) {
    if number == 0 {
        eprintln!("Error: DCP number must be positive");
        std::process::exit(1);
    }
    if !problems_dir.join(directory).is_dir() {
        eprintln!(
            "Error: directory '{}' not found in {}",
            directory,
            problems_dir.display()
        );
        std::process::exit(1);
    }

    let mut store = load_store(tracking_file);
    store.add(directory, number);
    if let Err(e) = store.save(tracking_file) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("Added DCP #{} to {}", number, directory);
}

fn show_untracked(problems_dir: &Path, tracking_file: &Path) {
    let store = load_store(tracking_file);
    let dirs = problem_directories(problems_dir);
    let untracked = store.untracked(dirs.iter().map(String::as_str));

    if untracked.is_empty() {
        println!("All problems have DCP numbers assigned.");
        return;
    }

    println!("Found {} problem(s) without DCP numbers:", untracked.len());
    println!();
    for dir_name in &untracked {
        println!("  - {}", dir_name);
    }
    println!();
    println!("Add one with: dcp track add <directory> <number>");
}

fn problem_directories(problems_dir: &Path) -> Vec<String> {
    let mut dirs = Vec::new();
    let entries = match fs::read_dir(problems_dir) {
        Ok(entries) => entries,
        Err(_) => return dirs,
    };
    for entry in entries.flatten() {
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                dirs.push(name.to_string());
            }
        }
    }
    dirs.sort();
    dirs
}

/// Title and company pulled back out of a generated readme.
fn readme_summary(path: &Path) -> (String, Option<String>) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return ("Unknown".to_string(), None),
    };

    let mut title = None;
    let mut company = None;
    for line in contents.lines() {
        if title.is_none() {
            if let Some(rest) = line.strip_prefix('#') {
                title = Some(rest.trim_start_matches('#').trim().to_string());
            }
        }
        if company.is_none() {
            if let Some(rest) = line.split("Asked by:").nth(1) {
                company = Some(
                    rest.trim_matches(|c: char| c == '*' || c.is_whitespace())
                        .to_string(),
                );
            }
        }
        if title.is_some() && company.is_some() {
            break;
        }
    }

    (title.unwrap_or_else(|| "Unknown".to_string()), company)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_problem_directories_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("2024_0315")).unwrap();
        fs::create_dir(tmp.path().join("2023_1204")).unwrap();
        fs::write(tmp.path().join("stray.txt"), "not a dir").unwrap();

        let dirs = problem_directories(tmp.path());
        assert_eq!(dirs, vec!["2023_1204".to_string(), "2024_0315".to_string()]);
    }

    #[test]
    fn test_problem_directories_missing_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(problem_directories(&tmp.path().join("nope")).is_empty());
    }

    #[test]
    fn test_readme_summary() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("readme.md");
        fs::write(
            &path,
            "# Airbnb\n\n**Date:** 2024-03-15\n\n**Asked by:** Airbnb\n\nProblem text.\n",
        )
        .unwrap();

        let (title, company) = readme_summary(&path);
        assert_eq!(title, "Airbnb");
        assert_eq!(company.as_deref(), Some("Airbnb"));
    }

    #[test]
    fn test_readme_summary_missing_file() {
        let tmp = TempDir::new().unwrap();
        let (title, company) = readme_summary(&tmp.path().join("readme.md"));
        assert_eq!(title, "Unknown");
        assert_eq!(company, None);
    }
}
