use std::path::PathBuf;

use crate::config;
use crate::models::Language;

pub fn handle_config(language: Option<Language>, problems_dir: Option<PathBuf>) {
    let mut user_config = config::load_config();

    if language.is_none() && problems_dir.is_none() {
        println!("Language: {}", user_config.language.display_name());
        println!(
            "Problems directory: {}",
            user_config.problems_dir.display()
        );
        println!();
        println!("To change: dcp config --language <lang> --problems-dir <path>");
        return;
    }

    if let Some(new_language) = language {
        user_config.language = new_language;
    }
    if let Some(new_dir) = problems_dir {
        user_config.problems_dir = new_dir;
    }

    if let Err(e) = config::save_config(&user_config) {
        eprintln!("Failed to save config: {}", e);
        std::process::exit(1);
    }

    println!("Configuration saved.");
    println!("Language: {}", user_config.language.display_name());
    println!(
        "Problems directory: {}",
        user_config.problems_dir.display()
    );
}
