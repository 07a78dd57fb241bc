//! Command-line driver for the Moabit library.
//!
//! Everything the host would do through the plugin contract is reachable
//! here for scripting and debugging: thumbnail a file, sniff its excerpt,
//! resolve or correct MIME types, dump the consumer declaration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use moabit::{
    DocumentRecord, MediaConfig, MediaParser, MimeTypeTable, correct_mime_type, detect_mime_type,
    media_consumer_declaration,
};
use moabit::plugins::DocumentParser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "moabit",
    version,
    about = "Media ingestion toolkit: thumbnails, search excerpts, MIME round-tripping"
)]
struct Cli {
    /// Config file (moabit.toml is discovered in parent directories when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a thumbnail for a media file
    Thumbnail {
        file: PathBuf,

        /// MIME type override (detected from the filename when omitted)
        #[arg(long)]
        mime_type: Option<String>,

        /// Output path for the WebP (defaults to `<file>.thumb.webp`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the indexable text excerpt from a file
    Extract {
        file: PathBuf,

        /// MIME type override (detected from the filename when omitted)
        #[arg(long)]
        mime_type: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve the MIME type a filename would be stored under
    Resolve { filename: String },

    /// Run the pre-save MIME correction against a hypothetical record
    Correct {
        filename: String,

        /// MIME type the host's detection assigned to the upload
        #[arg(long)]
        mime_type: String,
    },

    /// Print the consumer declaration handed to the host
    Declaration {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<MediaConfig> {
    match explicit {
        Some(path) => {
            MediaConfig::from_toml_file(path).with_context(|| format!("failed to load config from {}", path.display()))
        }
        None => Ok(MediaConfig::discover()
            .context("failed to discover moabit.toml")?
            .unwrap_or_default()),
    }
}

fn resolve_mime(file: &Path, explicit: Option<String>) -> Result<String> {
    match explicit {
        Some(mime_type) => Ok(mime_type),
        None => detect_mime_type(file, true).context("failed to detect MIME type"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Thumbnail { file, mime_type, output } => {
            let mime_type = resolve_mime(&file, mime_type)?;
            let file_name = file.file_name().and_then(|n| n.to_str()).map(str::to_string);

            let parser = MediaParser::new(config)?;
            let thumb = parser
                .get_thumbnail(&file, &mime_type, file_name.as_deref())
                .await
                .context("thumbnail generation failed")?;

            // The scratch directory dies with the parser; copy the result out.
            let output = output.unwrap_or_else(|| file.with_extension("thumb.webp"));
            std::fs::copy(&thumb, &output)
                .with_context(|| format!("failed to write thumbnail to {}", output.display()))?;
            println!("{}", output.display());
        }

        Command::Extract { file, mime_type, format } => {
            let mime_type = resolve_mime(&file, mime_type)?;
            let file_name = file.file_name().and_then(|n| n.to_str()).map(str::to_string);

            let parser = MediaParser::new(config)?;
            let parsed = parser
                .parse(&file, &mime_type, file_name.as_deref())
                .await
                .context("excerpt extraction failed")?;

            match format {
                OutputFormat::Text => println!("{}", parsed.text),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
            }
        }

        Command::Resolve { filename } => {
            let table = MimeTypeTable::load(&config.sidecar_path);
            let extension = Path::new(&filename)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext.to_lowercase()));

            let mime_type = match extension.as_deref().and_then(|ext| table.mime_for_extension(ext)) {
                Some(mime_type) => mime_type.to_string(),
                None => detect_mime_type(Path::new(&filename), false)?,
            };
            println!("{}", mime_type);
        }

        Command::Correct { filename, mime_type } => {
            let mut record = DocumentRecord::new(filename, mime_type);
            let before = record.mime_type.clone();
            correct_mime_type(&mut record, &config);

            if record.mime_type == before {
                println!("{} (unchanged)", record.mime_type);
            } else {
                println!("{} -> {}", before, record.mime_type);
            }
        }

        Command::Declaration { format } => {
            let declaration = media_consumer_declaration(&config);

            match format {
                OutputFormat::Text => {
                    println!("weight: {}", declaration.weight);
                    for (mime_type, extension) in &declaration.mime_types {
                        println!("{}: {}", mime_type, extension);
                    }
                }
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "weight": declaration.weight,
                        "mime_types": declaration.mime_types,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
            }
        }
    }

    Ok(())
}
