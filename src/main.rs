mod cleaner;
mod config;
mod distribution;
mod numfmt;
mod output;
mod pdf_text;
mod records;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use crate::config::Config;
use crate::pdf_text::ExtractionError;

#[derive(Parser)]
#[command(
    name = "rateio",
    about = "Extract (name, code, role, value) rows from PDF reports and apportion a total"
)]
struct Cli {
    /// PDF file or directory of PDF files (non-recursive)
    input: PathBuf,

    /// Intermediate text output path (default: input with .txt extension)
    #[arg(short = 't', long)]
    txt_output: Option<PathBuf>,

    /// CSV output path (default: input with .csv extension)
    #[arg(short = 'c', long)]
    csv_output: Option<PathBuf>,

    /// Also write a spreadsheet mirroring the CSV
    #[arg(short = 'x', long)]
    xlsx: bool,

    /// Print extracted records to the console
    #[arg(short = 'p', long)]
    print: bool,

    /// Keep headers and boilerplate (skip the cleaning pass)
    #[arg(long)]
    no_clean: bool,

    /// Compute each record's percentage of the batch total
    #[arg(long)]
    percentages: bool,

    /// Amount to distribute proportionally, locale-formatted (e.g. "9.902,53")
    #[arg(short = 'a', long)]
    amount: Option<String>,

    /// Distribute the configured default total
    #[arg(long)]
    distribute: bool,

    /// Config file path
    #[arg(long, default_value = "rateio.toml")]
    config: PathBuf,
}

/// Per-run settings shared by every file in the batch.
struct RunOptions {
    clean: bool,
    print: bool,
    xlsx: bool,
    want_percent: bool,
    target: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    // An unparsable target amount is fatal before any file work starts.
    let target = resolve_target(cli.amount.as_deref(), cli.distribute, &cfg)?;

    let opts = RunOptions {
        clean: !cli.no_clean,
        print: cli.print,
        xlsx: cli.xlsx,
        want_percent: cli.percentages || target.is_some(),
        target,
    };

    if !cli.input.exists() {
        return Err(format!("input path does not exist: {}", cli.input.display()).into());
    }

    if cli.input.is_dir() {
        process_directory(&cli.input, &opts)
    } else {
        let extracted = process_file(
            &cli.input,
            cli.txt_output.as_deref(),
            cli.csv_output.as_deref(),
            &opts,
        )?;
        if extracted == 0 {
            return Err(format!("no valid records extracted from {}", cli.input.display()).into());
        }
        Ok(())
    }
}

/// Resolve the distribution target: an explicit `--amount` (which must
/// parse), the configured default total under `--distribute`, or none.
fn resolve_target(
    amount: Option<&str>,
    distribute: bool,
    cfg: &Config,
) -> Result<Option<f64>, String> {
    match amount {
        Some(raw) => numfmt::parse(raw)
            .map(Some)
            .map_err(|e| format!("invalid --amount '{raw}': {e}")),
        None if distribute => Ok(Some(cfg.default_total)),
        None => Ok(None),
    }
}

/// Process every PDF in a directory, one fully completed before the
/// next begins. Extraction failures and empty files skip to the next
/// PDF; output failures abort the run.
fn process_directory(dir: &Path, opts: &RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let pdfs = pdf_files_in(dir)?;
    if pdfs.is_empty() {
        return Err(format!("no PDF files found in {}", dir.display()).into());
    }
    info!(count = pdfs.len(), "processing directory");

    let mut extracted_total = 0usize;
    for pdf in &pdfs {
        let span = tracing::info_span!("pdf", file = %pdf.display());
        let _guard = span.enter();

        // Directory mode always derives output names from the input file.
        match process_file(pdf, None, None, opts) {
            Ok(count) => {
                if count == 0 {
                    warn!("no valid records, skipping file");
                }
                extracted_total += count;
            }
            Err(e) if e.downcast_ref::<ExtractionError>().is_some() => {
                warn!(error = %e, "skipping file");
            }
            Err(e) => return Err(e),
        }
    }

    if extracted_total == 0 {
        return Err("no valid records extracted from any file".into());
    }
    Ok(())
}

fn pdf_files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();
    Ok(pdfs)
}

/// Run the full pipeline on one PDF. Returns the number of records
/// extracted; zero records means no CSV is written.
fn process_file(
    pdf: &Path,
    txt_out: Option<&Path>,
    csv_out: Option<&Path>,
    opts: &RunOptions,
) -> Result<usize, Box<dyn std::error::Error>> {
    info!(file = %pdf.display(), "processing");

    let raw = pdf_text::extract_text(pdf)?;
    let lines = if opts.clean {
        cleaner::clean(&raw)
    } else {
        cleaner::passthrough(&raw)
    };

    let txt_path = txt_out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| pdf.with_extension("txt"));
    output::write_txt(&lines, &txt_path)?;

    let mut records = records::parse_blocks(&lines);
    if records.is_empty() {
        return Ok(0);
    }
    info!(
        records = records.len(),
        total = %numfmt::format(distribution::total_value(&records)),
        "extraction complete"
    );

    if opts.want_percent {
        match distribution::compute_percentages(&mut records) {
            Ok(()) => {
                if let Some(target) = opts.target {
                    distribution::compute_proportional(&mut records, target);
                }
            }
            // Extraction and plain CSV output still succeed.
            Err(e) => warn!(error = %e, "dropping distribution columns"),
        }
    }

    if opts.print {
        output::print_records(&records, opts.target);
    }

    let csv_path = csv_out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| pdf.with_extension("csv"));
    output::write_csv(&records, &csv_path)?;

    if opts.xlsx {
        output::write_xlsx(&records, &csv_path.with_extension("xlsx"))?;
    }

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn pdf_listing_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"").unwrap();
        fs::write(dir.path().join("a.PDF"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let pdfs = pdf_files_in(dir.path()).unwrap();
        let names: Vec<_> = pdfs
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn empty_directory_has_no_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(pdf_files_in(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn unparsable_amount_is_fatal() {
        let cfg = Config::default();
        let err = resolve_target(Some("abc"), false, &cfg).unwrap_err();
        assert!(err.contains("invalid --amount 'abc'"));
    }

    #[test]
    fn explicit_amount_is_locale_parsed() {
        let cfg = Config::default();
        let target = resolve_target(Some("9.902,53"), false, &cfg).unwrap();
        assert_eq!(target, Some(9902.53));
    }

    #[test]
    fn distribute_falls_back_to_configured_total() {
        let cfg = Config {
            default_total: 500.0,
        };
        assert_eq!(resolve_target(None, true, &cfg).unwrap(), Some(500.0));
        assert_eq!(resolve_target(None, false, &cfg).unwrap(), None);
    }
}
