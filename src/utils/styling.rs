//! Terminal styling utilities for a modern, visually appealing TUI

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static PEOPLE: Emoji<'_, '_> = Emoji("👥 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     __       _      _
    / _| __ _(_)_ __| | ___ _ __  ___
   | |_ / _` | | '__| |/ _ \ '_ \/ __|
   |  _| (_| | | |  | |  __/ | | \__ \
   |_|  \__,_|_|_|  |_|\___|_| |_|___/
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("⚖").magenta().bold(),
        style("Group fairness metrics for tabular data").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(
    input: &Path,
    demographic: &str,
    target: &str,
    outputs: &[&Path],
    codes_as_categorical: bool,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:       {:<34}│",
        FOLDER,
        truncate_path(input, 33)
    );
    println!(
        "    │  {} Demographic: {:<34}│",
        PEOPLE,
        truncate_string(demographic, 33)
    );
    println!(
        "    │  {} Target:      {:<34}│",
        TARGET,
        truncate_string(target, 33)
    );
    for output in outputs {
        println!(
            "    │  {} Output:      {:<34}│",
            SAVE,
            truncate_path(output, 33)
        );
    }
    println!("    ├{}┤", line);
    println!(
        "    │  {} Codes as categorical: {:<25}│",
        LINK,
        style(if codes_as_categorical { "yes" } else { "no" }).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Fairness analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

pub(crate) fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
