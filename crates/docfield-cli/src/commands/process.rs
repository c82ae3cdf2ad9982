//! Process command - extract fields from a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use docfield_core::{DocfieldConfig, DocumentFields, Extractor, Page};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (observations JSON, or an image with OCR support)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    overrides: ExtractionOverrides,

    /// Show identifier candidate scores
    #[arg(long)]
    show_scores: bool,
}

/// Per-run overrides of the configured extraction settings.
#[derive(Args, Clone, Default)]
pub struct ExtractionOverrides {
    /// Anchor keyword for identifier scoring
    #[arg(short, long)]
    anchor: Option<String>,

    /// Label keyword to match dates against (repeatable)
    #[arg(short, long = "label")]
    labels: Vec<String>,

    /// Report labeled dates as YYYY-MM-DD instead of as written
    #[arg(long)]
    canonical: bool,
}

impl ExtractionOverrides {
    pub fn apply(&self, mut config: DocfieldConfig) -> DocfieldConfig {
        if let Some(anchor) = &self.anchor {
            config.scoring.anchor = anchor.clone();
        }
        if !self.labels.is_empty() {
            config.labels.keywords = self.labels.clone();
        }
        if self.canonical {
            config.labels.canonical_values = true;
        }
        config
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per extracted value
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = args.overrides.apply(load_config(config_path)?);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading observations...");
    pb.set_position(10);
    let extractor = Extractor::new(config);
    let page = load_page(&args.input, &extractor)?;

    pb.set_message("Extracting fields...");
    pb.set_position(60);
    let fields = extractor.extract_document(&page);

    pb.finish_and_clear();

    let output = format_fields(&fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_scores {
        eprintln!();
        eprintln!("{} Identifier candidates:", style("ℹ").blue());
        for candidate in extractor.identifier_candidates(&page.observations) {
            eprintln!("  {:>4}  {}", candidate.score, candidate.text);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load a page of observations from a JSON file, or run OCR on an image.
pub fn load_page(path: &Path, extractor: &Extractor) -> anyhow::Result<Page> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => Ok(Page::from_file(path)?),
        "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => recognize_image(path, extractor),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

#[cfg(feature = "native")]
fn recognize_image(path: &Path, extractor: &Extractor) -> anyhow::Result<Page> {
    use docfield_core::PureOcrProvider;

    let image = image::open(path)?;
    let provider = PureOcrProvider::from_config(&extractor.config().ocr)
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))?;

    let page = extractor.recognize(&provider, &image)?;
    debug!("OCR produced {} observations", page.observations.len());

    Ok(page)
}

#[cfg(not(feature = "native"))]
fn recognize_image(path: &Path, _extractor: &Extractor) -> anyhow::Result<Page> {
    anyhow::bail!(
        "Cannot read {}: OCR support is not enabled.\n\n\
         Rebuild with '--features native' or pass an observations JSON file.",
        path.display()
    )
}

pub fn format_fields(fields: &DocumentFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_csv(fields: &DocumentFields) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["kind", "label", "value"])?;

    for identifier in &fields.identifiers {
        wtr.write_record(["identifier", "", identifier])?;
    }
    for (label, value) in &fields.labeled_dates {
        wtr.write_record(["labeled_date", label, value])?;
    }
    for date in &fields.dates {
        wtr.write_record(["date", "", date])?;
    }
    for block in &fields.blocks {
        wtr.write_record(["block", "", &block.text])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &DocumentFields) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Identifier: {}\n",
        fields.identifier().unwrap_or("-")
    ));
    if fields.identifiers.len() > 1 {
        output.push_str(&format!("  Alternatives: {}\n", fields.identifiers[1..].join(", ")));
    }
    output.push('\n');

    output.push_str("Labeled dates:\n");
    if fields.labeled_dates.is_empty() {
        output.push_str("  (none)\n");
    }
    for (label, value) in &fields.labeled_dates {
        output.push_str(&format!("  {}: {}\n", label, value));
    }
    output.push('\n');

    output.push_str(&format!("Dates: {}\n", fields.dates.join(", ")));
    output.push('\n');

    output.push_str(&format!("Blocks ({}):\n", fields.blocks.len()));
    for block in &fields.blocks {
        output.push_str(&format!("  - {}\n", block.text));
    }

    output
}
