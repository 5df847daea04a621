//! uach CLI - Command-line interface for the Client-Hints transform
//!
//! Commands:
//! - transform: Convert GHEV / Base64 GHEV / SUA input into evidence JSON
//! - encode: Base64-encode input (to produce ghev-base64 input)
//! - hints: Print the Client-Hint to evidence-key table

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use uach_transform::{base64, ClientHint, HintFormat, Limits, Transform, TRANSFORM_VERSION};

/// uach - Convert User-Agent Client Hints into device-detection evidence
#[derive(Parser)]
#[command(name = "uach")]
#[command(version = TRANSFORM_VERSION)]
#[command(about = "Convert GHEV and SUA client hints into evidence", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert client-hint input into an evidence map
    Transform {
        /// Input format
        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Pretty-print the evidence JSON
        #[arg(long)]
        pretty: bool,

        /// Pre-allocated evidence entries
        #[arg(long, default_value = "16")]
        capacity: u32,

        /// Reject inputs larger than this many bytes
        #[arg(long)]
        max_input_bytes: Option<usize>,
    },

    /// Base64-encode input
    Encode {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },

    /// Print the Client-Hint table
    Hints {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// getHighEntropyValues() JSON
    Ghev,
    /// Base64-encoded getHighEntropyValues() JSON
    GhevBase64,
    /// OpenRTB structured user agent JSON
    Sua,
}

impl From<FormatArg> for HintFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Ghev => HintFormat::Ghev,
            FormatArg::GhevBase64 => HintFormat::GhevBase64,
            FormatArg::Sua => HintFormat::Sua,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliReport::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Transform {
            format,
            input,
            pretty,
            capacity,
            max_input_bytes,
        } => cmd_transform(format.into(), &input, pretty, capacity, max_input_bytes),

        Commands::Encode { input } => cmd_encode(&input),

        Commands::Hints { json } => cmd_hints(json),
    }
}

fn cmd_transform(
    format: HintFormat,
    input: &Path,
    pretty: bool,
    capacity: u32,
    max_input_bytes: Option<usize>,
) -> Result<(), CliError> {
    let input_data = read_input(input)?;

    let mut limits = Limits::default();
    if let Some(max) = max_input_bytes {
        limits.max_input_size = max;
    }
    let transform = Transform::with_capacity(capacity).with_limits(limits);

    // Files usually end with a newline, which strict Base64 would reject.
    let evidence = transform.transform(format, input_data.trim())?;

    let output = if pretty {
        serde_json::to_string_pretty(&evidence)?
    } else {
        serde_json::to_string(&evidence)?
    };
    println!("{}", output);

    Ok(())
}

fn cmd_encode(input: &Path) -> Result<(), CliError> {
    let input_data = read_input(input)?;
    println!("{}", base64::encode(input_data.trim_end().as_bytes()));
    Ok(())
}

fn cmd_hints(json: bool) -> Result<(), CliError> {
    let rows: Vec<HintRow> = ClientHint::ALL
        .into_iter()
        .map(|hint| HintRow {
            hint,
            header: hint.header_name(),
            evidence_key: hint.evidence_key(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Client Hints");
        println!("============");
        for row in &rows {
            println!("  {:<30} -> {}", row.header, row.evidence_key);
        }
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String, CliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(CliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

#[derive(serde::Serialize)]
struct HintRow {
    hint: ClientHint,
    header: &'static str,
    evidence_key: &'static str,
}

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Transform(uach_transform::TransformError),
    Json(serde_json::Error),
    NoInput,
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<uach_transform::TransformError> for CliError {
    fn from(e: uach_transform::TransformError) -> Self {
        CliError::Transform(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliReport {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliError> for CliReport {
    fn from(e: CliError) -> Self {
        match e {
            CliError::Io(e) => CliReport {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliError::Transform(e) => {
                let hint = match &e {
                    uach_transform::TransformError::MalformedBase64(_) => {
                        Some("Input must be padded standard Base64 without line breaks")
                    }
                    uach_transform::TransformError::UnexpectedShape { .. } => {
                        Some("Check that --format matches the input")
                    }
                    uach_transform::TransformError::ResourceLimit { .. } => {
                        Some("Raise --max-input-bytes if the input is legitimate")
                    }
                    uach_transform::TransformError::MalformedJson { .. } => {
                        Some("Check JSON syntax")
                    }
                };
                CliReport {
                    code: e.code().to_string(),
                    message: e.to_string(),
                    hint: hint.map(str::to_string),
                }
            }
            CliError::Json(e) => CliReport {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            CliError::NoInput => CliReport {
                code: "NO_INPUT".to_string(),
                message: "No input provided on stdin".to_string(),
                hint: Some("Pipe input in or pass --input FILE".to_string()),
            },
        }
    }
}
