use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tablediff_core::{Config, Report, Severity, TableSchema};
use tablediff_engine::{MigrationImpact, SchemaComparator};

/// TableDiff - Table schema comparison for migration tooling
#[derive(Parser)]
#[command(name = "tablediff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: tablediff.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two schema snapshots and report every column change
    Compare {
        /// Path to the initial schema JSON
        initial: PathBuf,

        /// Path to the target schema JSON
        target: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,

        /// Table name used in diagnostics (default: target file stem)
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Show the columns of a schema snapshot
    Show {
        /// Path to the schema JSON
        schema: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if std::path::Path::new("tablediff.toml").exists() {
        Config::from_file(std::path::Path::new("tablediff.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Compare {
            initial,
            target,
            output,
            markdown,
            table,
        } => compare_command(
            &config,
            &initial,
            &target,
            &output,
            markdown.as_ref().map(|v| v.as_path()),
            table,
            cli.verbose,
        ),
        Commands::Show { schema } => show_command(&schema, cli.verbose),
    }
}

/// Compare command - diff two schema snapshots and assess migration impact
fn compare_command(
    config: &Config,
    initial_path: &Path,
    target_path: &Path,
    output: &PathBuf,
    markdown: Option<&Path>,
    table: Option<String>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("{} {}", "Loading initial schema from:".cyan(), initial_path.display());
    }

    let initial = TableSchema::from_file(initial_path)?;

    if verbose {
        eprintln!("{} {}", "Loading target schema from:".cyan(), target_path.display());
    }

    let target = TableSchema::from_file(target_path)?;

    // Table name defaults to the target file stem
    let table = table.unwrap_or_else(|| {
        target_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "table".to_string())
    });

    tracing::debug!(
        "Comparing {} initial columns against {} target columns for table '{}'",
        initial.len(),
        target.len(),
        table
    );

    let changes = SchemaComparator::compare(&initial, &target);

    if verbose {
        if changes.is_empty() {
            eprintln!("{}", "✓ Schemas are equivalent".green());
        } else {
            eprintln!(
                "  {} removed, {} modified, {} added",
                changes.removed().len().to_string().red(),
                changes.modified().len().to_string().yellow(),
                changes.added().len().to_string().green()
            );
        }
    }

    let impact = MigrationImpact::assess(table.as_str(), &changes, config);
    let destructive = impact.requires_destructive_ddl();

    // Build report with diagnostics
    let mut report = Report::from_diagnostics(impact.diagnostics).with_table(table.as_str());
    report.metadata = Some(serde_json::json!({
        "initial": initial_path.display().to_string(),
        "target": target_path.display().to_string(),
    }));

    // Save JSON report
    report.save_to_file(output)?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    // Save markdown report if requested
    if let Some(md_path) = markdown {
        let markdown_content = generate_markdown_report(&report);
        std::fs::write(md_path, markdown_content)?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    // Print summary
    print_report_summary(&report);

    if destructive {
        println!(
            "{}",
            "⚠ Applying the target schema would require destructive DDL!"
                .yellow()
                .bold()
        );
        println!();
    }

    // Exit with error code if there are errors
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Show command - print the columns of a schema snapshot
fn show_command(schema_path: &Path, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("{} {}", "Loading schema from:".cyan(), schema_path.display());
    }

    let schema = TableSchema::from_file(schema_path)?;

    tracing::debug!("Loaded {} columns from {}", schema.len(), schema_path.display());

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Table Schema".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{} {}", "File:".bold(), schema_path.display());
    println!("{} {}", "Columns:".bold(), schema.len());
    println!();

    if schema.is_empty() {
        println!("{}", "Schema has no columns".yellow());
    } else {
        for (i, column) in schema.columns.iter().enumerate() {
            println!("  {}. {} {}", i + 1, column.name.yellow(), column.definition);
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());

    Ok(())
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Comparison Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    if let Some(table) = &report.table {
        println!("Table: {}", table);
    }
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    println!("  Columns removed:  {}", report.summary.columns_removed);
    println!("  Columns modified: {}", report.summary.columns_modified);
    println!("  Columns added:    {}", report.summary.columns_added);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ Schemas are equivalent!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(column) = &diag.column {
                println!("    Column: {}", column);
            }

            if let Some(before) = &diag.before {
                println!("    Before: {}", before);
            }
            if let Some(after) = &diag.after {
                println!("    After:  {}", after);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Schema Comparison Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));
    if let Some(table) = &report.table {
        md.push_str(&format!("**Table:** {}\n\n", table));
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Total diagnostics: {}\n", report.summary.total));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push_str(&format!("- Columns removed: {}\n", report.summary.columns_removed));
    md.push_str(&format!("- Columns modified: {}\n", report.summary.columns_modified));
    md.push_str(&format!("- Columns added: {}\n", report.summary.columns_added));
    md.push_str("\n");

    if report.diagnostics.is_empty() {
        md.push_str("✅ **Schemas are equivalent!**\n");
    } else {
        md.push_str("## Diagnostics\n\n");

        for diag in &report.diagnostics {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => "ℹ️",
            };

            md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
            md.push_str(&format!("{}\n\n", diag.message));

            if let Some(column) = &diag.column {
                md.push_str(&format!("**Column:** {}\n\n", column));
            }

            if let Some(before) = &diag.before {
                md.push_str(&format!("**Before:** `{}`\n\n", before));
            }
            if let Some(after) = &diag.after {
                md.push_str(&format!("**After:** `{}`\n\n", after));
            }
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
