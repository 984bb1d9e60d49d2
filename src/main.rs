use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use reply_doc::Config;

#[derive(Parser)]
#[command(name = "reply-doc")]
#[command(about = "Structure an assistant reply into sections and render it")]
struct Cli {
    /// Input text file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Output format: html, typst, json or pdf
    #[arg(short, long, default_value = "html")]
    format: String,

    /// Output file (defaults to stdout; required for pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file with segmenter thresholds and renderer options
    #[arg(short, long, default_value = "reply-doc.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    let reply = match cli.input {
        Some(ref path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            input
        }
    };

    if cli.format == "pdf" {
        let Some(ref output) = cli.output else {
            bail!("--output is required for pdf");
        };
        let pdf_bytes = reply_doc::reply_to_pdf_with_config(&reply, &config)?;
        fs::write(output, pdf_bytes)
            .with_context(|| format!("failed to write {}", output.display()))?;
        eprintln!("Created {}", output.display());
        return Ok(());
    }

    let renderer = reply_doc::render::create_renderer(&cli.format, &config)?;
    let doc = reply_doc::parse_with_config(&reply, &config);
    tracing::debug!(
        structured = doc.is_structured(),
        sections = doc.sections().len(),
        "parsed reply"
    );
    let rendered = renderer.render(&doc);

    match cli.output {
        Some(ref output) => fs::write(output, rendered)
            .with_context(|| format!("failed to write {}", output.display()))?,
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("failed to write stdout")?,
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
