//! Sheetserv CLI - read and write spreadsheets from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetserv::prelude::*;
use std::io::Read as _;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetserv")]
#[command(author, version, about = "Spreadsheet read/write tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read rows from a sheet and print them as JSON
    Read {
        /// Input workbook (xlsx, xlsm, xlsb, xls, ods)
        input: PathBuf,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Sheet index, 0-based (ignored when --sheet is given)
        #[arg(short = 'i', long)]
        index: Option<usize>,

        /// A1-notation range, e.g. A1:C10
        #[arg(short, long)]
        range: Option<String>,

        /// Treat the first row as headers
        #[arg(long)]
        headers: bool,

        /// Drop rows whose cells are all empty
        #[arg(long)]
        skip_empty: bool,

        /// Maximum number of data rows
        #[arg(short, long)]
        max_rows: Option<usize>,
    },

    /// Write rows (JSON array of arrays, from a file or stdin) to a new xlsx
    Write {
        /// Output workbook path (.xlsx appended when missing)
        output: PathBuf,

        /// JSON file with the rows (default: stdin)
        #[arg(short = 'f', long)]
        rows: Option<PathBuf>,

        /// Comma-separated header row
        #[arg(long)]
        headers: Option<String>,

        /// Sheet name for the new workbook
        #[arg(short, long, default_value = sheetserv::DEFAULT_SHEET_NAME)]
        sheet: String,
    },

    /// Show workbook metadata
    Info {
        /// Input workbook
        input: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input workbook
        input: PathBuf,
    },

    /// Print a single cell value
    Cell {
        /// Input workbook
        input: PathBuf,

        /// A1 cell reference, e.g. B2
        cell: String,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let service = Service::default();

    match cli.command {
        Commands::Read {
            input,
            sheet,
            index,
            range,
            headers,
            skip_empty,
            max_rows,
        } => read(&service, &input, sheet, index, range, headers, skip_empty, max_rows),
        Commands::Write {
            output,
            rows,
            headers,
            sheet,
        } => write(&service, &output, rows.as_deref(), headers.as_deref(), &sheet),
        Commands::Info { input } => info(&service, &input),
        Commands::Sheets { input } => sheets(&service, &input),
        Commands::Cell { input, cell, sheet } => cell_value(&service, &input, &cell, sheet),
    }
}

#[allow(clippy::too_many_arguments)]
fn read(
    service: &Service,
    input: &PathBuf,
    sheet: Option<String>,
    index: Option<usize>,
    range: Option<String>,
    headers: bool,
    skip_empty: bool,
    max_rows: Option<usize>,
) -> Result<()> {
    let mut request = ReadRequest::new(input.display().to_string());
    request.sheet_name = sheet;
    request.sheet_index = index;
    request.cell_range = range;
    request.include_headers = headers;
    request.skip_empty_rows = skip_empty;
    request.max_rows = max_rows;

    let data = service
        .read(&request)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn write(
    service: &Service,
    output: &PathBuf,
    rows_file: Option<&std::path::Path>,
    headers: Option<&str>,
    sheet: &str,
) -> Result<()> {
    let json = match rows_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read rows from stdin")?;
            buf
        }
    };
    let rows: Vec<Vec<CellValue>> =
        serde_json::from_str(&json).context("Rows must be a JSON array of arrays")?;

    let mut request = WriteRequest::new(output.display().to_string(), rows).sheet(sheet);
    if let Some(headers) = headers {
        request = request.headers(headers.split(','));
    }

    let response = service
        .write(&request)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!(
        "Wrote {} rows x {} columns to '{}' ({} bytes)",
        response.rows_written, response.column_count, response.file_path, response.file_size_bytes
    );
    Ok(())
}

fn info(service: &Service, input: &PathBuf) -> Result<()> {
    let info = service
        .info(&input.display().to_string())
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", info.file_path);
    println!("Format: {}", info.file_format);
    println!("Size: {} bytes", info.file_size_bytes);
    if let Some(modified) = info.modified_at {
        println!("Modified: {}", modified.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("Sheets: {}", info.sheets.len());

    for sheet in &info.sheets {
        println!();
        println!("  Sheet {}: \"{}\"", sheet.index, sheet.name);
        if sheet.row_count == 0 {
            println!("    Used range: empty");
        } else {
            println!(
                "    Used range: {} rows x {} columns",
                sheet.row_count, sheet.column_count
            );
        }
    }

    Ok(())
}

fn sheets(service: &Service, input: &PathBuf) -> Result<()> {
    let names = service
        .list_sheets(&input.display().to_string())
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    for (index, name) in names.iter().enumerate() {
        println!("{index}\t{name}");
    }

    Ok(())
}

fn cell_value(service: &Service, input: &PathBuf, cell: &str, sheet: Option<String>) -> Result<()> {
    let value = service
        .cell_value(&input.display().to_string(), cell, sheet.as_deref())
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    println!("{value}");
    Ok(())
}
