//! Command-line front end: reads a digitized book page, writes the
//! segmented model as JSON or XML.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::debug;

use capitula::{segment_bytes_with_options, xml, BookModel, Options, Result};

#[derive(Parser)]
#[command(
    name = "capitula",
    about = "Segment digitized-book HTML into numbered sections",
    version
)]
struct Cli {
    /// Input file; stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Minimum characters for a content block to count
    #[arg(long, default_value_t = 3)]
    min_block_chars: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Xml,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = Options {
        min_block_chars: cli.min_block_chars,
        ..Options::default()
    };

    let bytes = read_input(cli.input.as_deref())?;
    let model = segment_bytes_with_options(&bytes, &options)?;
    debug!(
        sections = model.sections.len(),
        items = model.item_count(),
        "segmented"
    );
    write_output(cli.output.as_deref(), &render(&model, cli.format, cli.pretty))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read(path)?),
        _ => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

fn render(model: &BookModel, format: Format, pretty: bool) -> String {
    match format {
        Format::Json if pretty => serde_json::to_string_pretty(model).unwrap_or_default(),
        Format::Json => serde_json::to_string(model).unwrap_or_default(),
        Format::Xml => xml::to_xml_string(model),
    }
}

fn write_output(path: Option<&Path>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
