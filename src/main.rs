//! fairlens: Group Fairness CLI Tool
//!
//! A command-line tool for measuring group fairness of an outcome column
//! across the groups of a demographic column.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use fairlens::cli::{confirm_step, select_column, Cli};
use fairlens::pipeline::{analyze_fairness, load_dataset_with_progress, preview};
use fairlens::report::{display_metrics, export_csv, export_json};
use fairlens::utils::{
    create_spinner, finish_with_success, finish_with_warning, init_logging, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;

    print_banner(env!("CARGO_PKG_VERSION"));

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(input, cli.infer_schema_length)?;

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    println!(
        "      {}",
        style(format!("Loaded in {:.2}s", step_start.elapsed().as_secs_f64())).dim()
    );

    if cli.preview > 0 {
        println!("\n    {} Data Preview:", style("✧").cyan());
        println!("{}", preview(&df, cli.preview));
    }

    // Resolve column selection - from arguments or interactively
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let demographic = match &cli.demographic {
        Some(d) => d.clone(),
        None if cli.no_confirm => anyhow::bail!(
            "Demographic column is required when using --no-confirm. Use -d/--demographic to specify."
        ),
        None => select_column("Select demographic attribute", &columns, None)?,
    };
    let target = match &cli.target {
        Some(t) => t.clone(),
        None if cli.no_confirm => anyhow::bail!(
            "Target column is required when using --no-confirm. Use -t/--target to specify."
        ),
        None => select_column("Select target variable", &columns, Some(&demographic))?,
    };

    let config = cli.fairness_config(&demographic, &target);
    let csv_output = cli.csv_output_path();
    let json_output = cli.json_output_path();
    let outputs: Vec<&std::path::Path> = csv_output
        .iter()
        .chain(json_output.iter())
        .map(PathBuf::as_path)
        .collect();

    println!();
    print_config(input, &demographic, &target, &outputs, config.codes_as_categorical);

    if !cli.no_confirm && !confirm_step("Run fairness analysis?")? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Step 2: Fairness analysis
    print_step_header(2, "Fairness Analysis");
    let spinner = create_spinner("Computing fairness metrics...");
    let report = match analyze_fairness(&df, &config) {
        Ok(report) => report,
        Err(e) => {
            finish_with_warning(&spinner, "Fairness analysis failed");
            return Err(e.into());
        }
    };
    finish_with_success(&spinner, "Fairness metrics computed");

    if report.encodings.is_empty() {
        print_info("No categorical columns needed encoding");
    } else {
        print_count("categorical column(s) encoded", report.encodings.len(), None);
    }

    let table = &report.table;
    print_count(
        "comparison group(s)",
        table.len(),
        Some(&format!("(reference: {})", table.reference().label)),
    );
    if table.rows().iter().any(|r| r.disparate_impact.is_nan()) {
        print_warning(
            "Disparate impact is undefined for some groups (zero reference mean or no target values)",
        );
    }
    if table.association().value.is_nan() {
        print_warning("Association statistic is undefined for this data");
    }

    display_metrics(table);

    // Step 3: Export results
    if csv_output.is_some() || json_output.is_some() {
        print_step_header(3, "Save Results");

        if let Some(path) = &csv_output {
            export_csv(table, path)?;
            print_success(&format!("Metrics saved to {}", path.display()));
        }
        if let Some(path) = &json_output {
            export_json(table, &config, &input.display().to_string(), path)?;
            print_success(&format!("Report saved to {}", path.display()));
        }
    }

    print_completion();

    Ok(())
}
