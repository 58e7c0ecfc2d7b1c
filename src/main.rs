use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use polysql::catalog::Schema;

#[derive(Parser)]
#[command(author, version, about = "polysql - parse SQL schema scripts written for T-SQL, MySQL, PostgreSQL or SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files and report how many statements each contains
    Parse {
        /// Print every statement
        #[arg(short, long)]
        verbose: bool,

        /// SQL files, or directories searched for *.sql files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Build one schema from all files and print its tables
    Schema {
        /// Print the schema as JSON
        #[arg(long)]
        json: bool,

        /// SQL files, or directories searched for *.sql files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { verbose, paths } => run_parse(&paths, verbose),
        Commands::Schema { json, paths } => run_schema(&paths, json),
    }
}

/// Expand directories into their *.sql files, in sorted order
fn collect_sql_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_directory(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn walk_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("cannot list directory {}", dir.display()))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_directory(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("sql")) {
            files.push(path);
        }
    }
    Ok(())
}

fn run_parse(paths: &[PathBuf], verbose: bool) -> Result<ExitCode> {
    let mut failed = false;

    for file in collect_sql_files(paths)? {
        match polysql::parse_file(&file) {
            Ok(statements) => {
                println!("{}: {} statements", file.display(), statements.len());
                if verbose {
                    for statement in &statements {
                        println!("  {}", statement);
                    }
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                failed = true;
            }
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn run_schema(paths: &[PathBuf], json: bool) -> Result<ExitCode> {
    let mut schema = Schema::new();
    let mut failed = false;

    // A failing file leaves the schema as it was before that file
    for file in collect_sql_files(paths)? {
        if let Err(e) = schema.parse_file(&file) {
            eprintln!("{}", e);
            failed = true;
        }
    }
    if let Err(e) = schema.resolve() {
        eprintln!("{}", e);
        failed = true;
    }

    if json {
        let text = serde_json::to_string_pretty(&schema).context("cannot serialize schema")?;
        println!("{}", text);
    } else {
        for table in schema.tables() {
            println!("{}\n", table.schema_string());
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
