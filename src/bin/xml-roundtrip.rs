//! Rewrite an XML project file in place with its layout normalized.
//!
//! Usage:
//!   xml-roundtrip `<path>` [--newline crlf|lf] [--no-bom] [--stdout] [--echo]

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use xml_roundtrip::{
    decode, rewrite_file_with, rewrite_str_with, ContentNewlines, Echo, Identity, LineTransform,
    RewriteOptions,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Newline {
    Crlf,
    Lf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ContentMode {
    /// Keep line breaks inside text exactly as read
    Verbatim,
    /// Replace line breaks inside text with the line terminator
    Terminator,
}

#[derive(Debug, Parser)]
#[command(version, about = "Rewrite XML project files while preserving their layout")]
struct Cli {
    /// XML file to rewrite in place
    path: PathBuf,

    /// Line terminator of the output
    #[arg(long, value_enum, default_value = "crlf")]
    newline: Newline,

    /// Handling of line breaks inside text content
    #[arg(long, value_enum, default_value = "verbatim")]
    content_newlines: ContentMode,

    /// Do not start the output with a byte order mark
    #[arg(long)]
    no_bom: bool,

    /// Print the result instead of overwriting the file
    #[arg(long)]
    stdout: bool,

    /// Log every line event on its way through the pipeline
    #[arg(long)]
    echo: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = match verbose {
        0 => "xml_roundtrip=warn",
        1 => "xml_roundtrip=info",
        2 => "xml_roundtrip=debug",
        _ => "xml_roundtrip=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run<T: LineTransform>(
    cli: &Cli,
    options: &RewriteOptions,
    transform: T,
) -> xml_roundtrip::Result<()> {
    if cli.stdout {
        let bytes = std::fs::read(&cli.path)?;
        let text = decode(&bytes)?;
        print!("{}", rewrite_str_with(&text, options, transform)?);
        Ok(())
    } else {
        rewrite_file_with(&cli.path, options, transform)
    }
}

fn main() {
    let cli = Cli::parse();
    // The echo transform logs at info level.
    init_tracing(if cli.echo { cli.verbose.max(1) } else { cli.verbose });

    let options = RewriteOptions {
        newline: match cli.newline {
            Newline::Crlf => "\r\n",
            Newline::Lf => "\n",
        }
        .to_string(),
        content_newlines: match cli.content_newlines {
            ContentMode::Verbatim => ContentNewlines::Verbatim,
            ContentMode::Terminator => ContentNewlines::Terminator,
        },
        write_bom: !cli.no_bom,
        ..RewriteOptions::default()
    };

    let result = if cli.echo {
        run(&cli, &options, Echo::new(Identity))
    } else {
        run(&cli, &options, Identity)
    };
    if let Err(err) = result {
        eprintln!("{}: {}", cli.path.display(), err);
        process::exit(1);
    }
}
