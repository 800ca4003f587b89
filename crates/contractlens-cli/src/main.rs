mod config;
mod display;
mod extract;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use contractlens_ai::GroqClient;
use contractlens_core::{
    ClauseCategory, ContractDocument, DEFAULT_EXCERPT_CHARS, PageSource, PatternSet,
    PromptBuilder, SectionLocator, contract_id,
};
use contractlens_store::{PdfReader, ResultSink};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ExtractArgs;
use crate::extract::ClauseExtractor;

/// Extract termination, confidentiality and liability clauses from contract PDFs.
#[derive(Debug, Parser)]
#[command(name = "contractlens", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process every PDF in a directory and write JSON and CSV results.
    Extract(ExtractArgs),

    /// Show the sections the locator picks for one PDF, without calling the model.
    Locate {
        /// Contract PDF to inspect.
        #[arg(long)]
        pdf: PathBuf,

        /// Only this clause category (termination, confidentiality, liability).
        #[arg(long, value_parser = parse_category)]
        category: Option<ClauseCategory>,

        /// JSON file replacing the built-in ranked section patterns.
        #[arg(long, env = "CONTRACTLENS_PATTERNS")]
        patterns: Option<PathBuf>,

        /// Maximum excerpt length, in characters.
        #[arg(long, env = "CONTRACTLENS_EXCERPT_CHARS", default_value_t = DEFAULT_EXCERPT_CHARS)]
        excerpt_chars: usize,
    },

    /// Print the effective ranked pattern set as JSON.
    Patterns {
        /// JSON file replacing the built-in ranked section patterns.
        #[arg(long, env = "CONTRACTLENS_PATTERNS")]
        patterns: Option<PathBuf>,
    },
}

fn parse_category(s: &str) -> Result<ClauseCategory, String> {
    ClauseCategory::parse(s).ok_or_else(|| {
        format!("unknown clause category '{s}' (expected termination, confidentiality or liability)")
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => run_extract(args).await,
        Command::Locate {
            pdf,
            category,
            patterns,
            excerpt_chars,
        } => run_locate(pdf, category, patterns, excerpt_chars),
        Command::Patterns { patterns } => {
            let set = PatternSet::load_or_builtin(patterns.as_deref())
                .context("loading section patterns")?;
            println!("{}", set.config().to_json_pretty()?);
            Ok(())
        }
    }
}

async fn run_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let config = args.into_config().context("invalid configuration")?;
    info!(
        input = %config.input_dir.display(),
        documents = config.documents.len(),
        model = %config.completion.model,
        "contractlens v{}",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "Extracting clauses from {} PDF(s) in {}",
        config.documents.len(),
        config.input_dir.display()
    );

    let client = GroqClient::new(config.completion).context("building completion client")?;
    let extractor = ClauseExtractor::new(
        PdfReader::new(),
        client,
        SectionLocator::new(config.patterns, config.excerpt_chars),
        PromptBuilder::new(config.excerpt_chars, config.summary_chars),
        config.call_timeout,
    );

    let mut sink = ResultSink::new();
    let report = extractor.run_batch(&config.documents, &mut sink).await;
    display::print_batch_report(&report);

    let written = sink.write_all(&config.out_json, &config.out_csv);
    for (label, outcome) in [("json", &written.json), ("csv", &written.csv)] {
        if let Err(e) = outcome {
            error!(output = label, error = %e, "output not written");
        }
    }
    display::print_sink_report(&written, &config.out_json, &config.out_csv);

    if !written.any_written() {
        bail!("neither output could be written");
    }
    if report.processed == 0 {
        bail!("all {} document(s) failed extraction", report.total);
    }
    Ok(())
}

fn run_locate(
    pdf: PathBuf,
    category: Option<ClauseCategory>,
    patterns: Option<PathBuf>,
    excerpt_chars: usize,
) -> anyhow::Result<()> {
    if excerpt_chars == 0 {
        bail!("excerpt-chars must be greater than zero");
    }
    let patterns =
        PatternSet::load_or_builtin(patterns.as_deref()).context("loading section patterns")?;
    let locator = SectionLocator::new(patterns, excerpt_chars);

    let id = contract_id(&pdf);
    let pages = PdfReader::new()
        .read_pages(&pdf)
        .with_context(|| format!("reading {}", pdf.display()))?;
    let doc = ContractDocument::from_pages(id, pages)
        .with_context(|| format!("extracting text from {}", pdf.display()))?;
    info!(
        contract = doc.id(),
        pages = doc.pages().len(),
        readable = doc.readable_pages(),
        chars = doc.text().chars().count(),
        "normalised document"
    );

    let categories = match category {
        Some(c) => vec![c],
        None => ClauseCategory::ALL.to_vec(),
    };
    for category in categories {
        let section = locator.locate(doc.text(), category);
        display::print_section_match(doc.id(), &section);
    }
    Ok(())
}
