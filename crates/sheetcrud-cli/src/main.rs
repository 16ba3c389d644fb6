//! sheetcrud CLI - create, read and edit XLSX workbooks

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetcrud::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetcrud")]
#[command(author, version, about = "Create, read and edit XLSX workbooks")]
struct Cli {
    /// Address the row named by a reference's digits instead of row 1
    #[arg(long, global = true)]
    parse_row_numbers: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a workbook with one empty sheet named Sheet1
    Create {
        /// Workbook file to create (overwritten if it exists)
        path: PathBuf,
    },

    /// Print the first sheet as tab-separated text
    Read {
        /// Workbook file
        path: PathBuf,
    },

    /// Set a cell to a plain string value
    Update {
        /// Workbook file
        path: PathBuf,

        /// Sheet name (case-sensitive)
        sheet: String,

        /// Cell reference, e.g. B3
        reference: String,

        /// New cell text
        value: String,
    },

    /// Delete a row by its row index
    #[command(alias = "rm")]
    DeleteRow {
        /// Workbook file
        path: PathBuf,

        /// Sheet name (case-sensitive)
        sheet: String,

        /// Row index (1-based)
        row: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut options = CodecOptions::new();
    if cli.parse_row_numbers {
        options = options.parse_row_numbers();
    }
    let service = OpenXmlService::with_options(options);

    match cli.command {
        Commands::Create { path } => create(&service, &path),
        Commands::Read { path } => read(&service, &path),
        Commands::Update {
            path,
            sheet,
            reference,
            value,
        } => update(&service, &path, &sheet, &reference, &value),
        Commands::DeleteRow { path, sheet, row } => delete_row(&service, &path, &sheet, row),
    }
}

fn create(service: &dyn SheetService, path: &Path) -> Result<()> {
    service
        .create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    eprintln!("Created '{}'", path.display());
    Ok(())
}

fn read(service: &dyn SheetService, path: &Path) -> Result<()> {
    let table = service
        .read(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    if table.is_empty() {
        eprintln!("Warning: Sheet appears to be empty");
        return Ok(());
    }
    print!("{table}");
    Ok(())
}

fn update(
    service: &dyn SheetService,
    path: &Path,
    sheet: &str,
    reference: &str,
    value: &str,
) -> Result<()> {
    service
        .update_cell(path, sheet, reference, value)
        .with_context(|| format!("Failed to update {}!{} in '{}'", sheet, reference, path.display()))?;
    eprintln!("Updated {}!{}", sheet, reference);
    Ok(())
}

fn delete_row(service: &dyn SheetService, path: &Path, sheet: &str, row: u32) -> Result<()> {
    let deleted = service
        .delete_row(path, sheet, row)
        .with_context(|| format!("Failed to delete row {} in '{}'", row, path.display()))?;

    if deleted {
        eprintln!("Deleted row {} from '{}'", row, sheet);
    } else {
        eprintln!("No row {} in '{}', file left unchanged", row, sheet);
    }
    Ok(())
}
