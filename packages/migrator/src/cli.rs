//! Command-line interface for the migrator.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use html_chunker::{Chunker, ChunkerConfig, OversizePolicy};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{parse_max_body_chars, MigrationConfig, DEFAULT_MAX_BODY_CHARS};
use crate::error::{MigratorError, Result};
use crate::migrate::{MigrationOptions, MigrationReport, Migrator, Progress};
use crate::store::StoreClient;

/// Blog Migrator - Copy blog articles between stores, splitting oversized bodies.
#[derive(Parser)]
#[command(name = "blog-migrator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Migrate articles from the source blog to the target blog.
    Migrate {
        /// Comma-separated article IDs to migrate
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Wildcard pattern to match article titles (e.g., "2024-*" or "*Tutorial*")
        #[arg(long)]
        pattern: Option<String>,

        /// Log the parts that would be created instead of creating them
        #[arg(long)]
        dry_run: bool,
    },

    /// Split a local HTML file into fragments.
    Split {
        /// HTML file to split
        file: PathBuf,

        /// Maximum fragment length in characters (default: MAX_BODY_CHARS or 240000)
        #[arg(short, long)]
        max_chars: Option<usize>,

        /// Handling of oversized atomic elements: pass-through, drop or reject
        #[arg(long)]
        policy: Option<String>,

        /// Directory to write fragments to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            only,
            pattern,
            dry_run,
        } => migrate_command(only, pattern, dry_run),
        Commands::Split {
            file,
            max_chars,
            policy,
            output,
        } => split_command(&file, max_chars, policy.as_deref(), output.as_deref()),
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb
}

/// Execute the migrate command.
fn migrate_command(only: Vec<String>, pattern: Option<String>, dry_run: bool) -> Result<()> {
    let mut config = MigrationConfig::from_env()?;
    config.behaviour.dry_run |= dry_run;

    let options = MigrationOptions {
        only_ids: only
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect(),
        pattern: pattern.filter(|p| !p.is_empty()),
    };

    println!(
        "{} {} {} {}",
        style("Migrating").bold(),
        style(&config.source.shop).cyan(),
        style("->").dim(),
        style(&config.target.shop).cyan()
    );
    if config.behaviour.dry_run {
        println!("  {}", style("Dry run: nothing will be created").yellow());
    }
    println!();

    let migrator = Migrator::new(
        StoreClient::new(&config.source)?,
        config.source.blog_handle.clone(),
        StoreClient::new(&config.target)?,
        config.target.blog_handle.clone(),
        config.behaviour.clone(),
    )?;

    let pb = spinner();
    pb.set_message("Listing articles...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = migrator.run_with_progress(&options, |progress| match progress {
        Progress::Listed { found, selected } => {
            pb.println(format!("  Found {found} articles; processing {selected}"));
        }
        Progress::Article {
            index,
            total,
            id,
            title,
        } => pb.set_message(format!("[{index}/{total}] #{id} {title}")),
    });
    pb.finish_and_clear();

    print_report(&result?);
    Ok(())
}

fn print_report(report: &MigrationReport) {
    for part in &report.planned {
        println!(
            "  {} title=\"{}\" chars={}",
            style("[DRY_RUN] Would create").yellow(),
            part.title,
            part.chars
        );
    }
    for warning in &report.chunk_warnings {
        println!("  {} {warning}", style("warning:").yellow().bold());
    }

    println!();
    println!(
        "{} {} of {} articles, {} parts created",
        style("Migration complete:").green().bold(),
        report.articles_processed,
        report.articles_found,
        report.parts_created
    );
    if report.metafield_failures > 0 {
        println!(
            "  Metafield copy failures: {}",
            style(report.metafield_failures).yellow().bold()
        );
    }
}

fn budget_from_env() -> Result<usize> {
    match std::env::var("MAX_BODY_CHARS") {
        Ok(value) => parse_max_body_chars(&value),
        Err(_) => Ok(DEFAULT_MAX_BODY_CHARS),
    }
}

/// Execute the split command.
fn split_command(
    file: &Path,
    max_chars: Option<usize>,
    policy: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let max_chars = match max_chars {
        Some(n) => n,
        None => budget_from_env()?,
    };
    let policy = match policy {
        Some(name) => name.parse::<OversizePolicy>()?,
        None => OversizePolicy::default(),
    };

    // Validate output directory exists (if specified) before splitting
    if let Some(output_dir) = output {
        if !output_dir.is_dir() {
            return Err(MigratorError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Output directory does not exist: {}", output_dir.display()),
            )));
        }
    }

    let html = fs::read_to_string(file)?;
    let chunker = Chunker::new(ChunkerConfig::new(max_chars)?.with_policy(policy));
    let result = chunker.chunk(&html)?;

    println!(
        "{} {} ({} chars, budget {})",
        style("Split").bold(),
        style(file.display()).cyan(),
        html.chars().count(),
        max_chars
    );
    println!("  Fragments: {}", style(result.len()).green());
    for (i, fragment) in result.fragments.iter().enumerate() {
        let size = fragment.len();
        let line = format!("    {:>3}: {size} chars", i + 1);
        if size > max_chars {
            println!("{}", style(line).red());
        } else {
            println!("{line}");
        }
    }
    if result.has_warnings() {
        println!("  Warnings: {}", style(result.diagnostics.len()).yellow().bold());
        for diagnostic in &result.diagnostics {
            println!("    {diagnostic}");
        }
    }

    if let Some(output_dir) = output {
        for (i, fragment) in result.fragments.iter().enumerate() {
            let path = output_dir.join(format!("part-{:03}.html", i + 1));
            fs::write(&path, fragment.html())?;
        }
        println!();
        println!(
            "{} {}",
            style("Saved to:").green().bold(),
            output_dir.display()
        );
    }

    Ok(())
}
