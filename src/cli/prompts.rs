//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to pick one column. The cursor starts on the first column other than `exclude`.
pub fn select_column(prompt: &str, columns: &[String], exclude: Option<&str>) -> Result<String> {
    if columns.is_empty() {
        anyhow::bail!("Dataset has no columns to select from");
    }

    let default = default_selection(columns, exclude);
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(columns)
        .default(default)
        .interact()?;

    Ok(columns[index].clone())
}

/// First column that is not `exclude`, falling back to the first column
pub fn default_selection(columns: &[String], exclude: Option<&str>) -> usize {
    columns
        .iter()
        .position(|c| Some(c.as_str()) != exclude)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_selection_skips_excluded() {
        let columns = cols(&["gender", "age", "hired"]);
        assert_eq!(default_selection(&columns, Some("gender")), 1);
        assert_eq!(default_selection(&columns, Some("age")), 0);
        assert_eq!(default_selection(&columns, None), 0);
    }

    #[test]
    fn test_default_selection_single_column() {
        let columns = cols(&["only"]);
        assert_eq!(default_selection(&columns, Some("only")), 0);
    }
}
