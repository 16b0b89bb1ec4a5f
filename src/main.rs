//! Purpose: `triform` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs conversions or the server.
//! Invariants: Converted output goes to stdout; errors go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.

use std::io::{self, IsTerminal, Read};
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::aot::Shell;
use serde_json::json;

mod serve;

use serve::ServeConfig;
use triform::api::{
    ConversionRequest, Document, Error, ErrorKind, Format, GroupedContent, convert, to_exit_code,
};

#[derive(Parser)]
#[command(
    name = "triform",
    version,
    about = "Convert segment documents between delimited text, grouped JSON, and XML"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a document read from a file or stdin
    Convert(ConvertArgs),
    /// Run the HTTP conversion API
    Serve(ServeArgs),
    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Source document format
    #[arg(long, value_enum)]
    from: Format,
    /// Target document format
    #[arg(long, value_enum)]
    to: Format,
    /// Segment separator for whichever side is the text format
    #[arg(long)]
    segment_separator: Option<String>,
    /// Element separator for whichever side is the text format
    #[arg(long)]
    element_separator: Option<String>,
    /// Print the full tagged document as JSON instead of bare content
    #[arg(long)]
    envelope: bool,
    /// Input file; reads stdin when omitted
    file: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:9800")]
    bind: String,
    /// Permit binding to a non-loopback address
    #[arg(long)]
    allow_non_loopback: bool,
    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    max_body_bytes: u64,
    /// Allowed CORS origin; repeatable. All origins are allowed when omitted.
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli.command) {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Convert(args) => run_convert(args),
        Command::Serve(args) => run_serve(args),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "triform", &mut io::stdout());
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), Error> {
    let content = read_content(args.file.as_deref())?;
    let document = build_document(args.from, content, &args)?;

    let request = ConversionRequest {
        document,
        target_format: args.to,
        segment_separator: args.segment_separator.clone(),
        element_separator: args.element_separator.clone(),
    };
    let converted = convert(&request)?;

    let output = if args.envelope {
        encode_json(&serde_json::to_value(&converted).map_err(encode_error)?)?
    } else {
        match converted {
            Document::Text { content, .. } | Document::Xml { content } => content,
            Document::Json { content } => {
                encode_json(&serde_json::Value::Object(content))?
            }
        }
    };
    println!("{output}");
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<(), Error> {
    let bind: SocketAddr = args.bind.parse().map_err(|_| {
        Error::new(ErrorKind::InvalidArgument)
            .with_message("invalid bind address")
            .with_hint("Use a host:port value like 127.0.0.1:9800.")
    })?;
    let config = ServeConfig {
        bind,
        allow_non_loopback: args.allow_non_loopback,
        max_body_bytes: args.max_body_bytes,
        cors_allowed_origins: args.cors_origins,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to start async runtime")
                .with_source(err)
        })?;
    runtime.block_on(serve::serve(config))
}

fn read_content(file: Option<&std::path::Path>) -> Result<String, Error> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(content)
        }
    }
}

fn build_document(format: Format, content: String, args: &ConvertArgs) -> Result<Document, Error> {
    match format {
        Format::Text => {
            let (Some(segment_separator), Some(element_separator)) = (
                args.segment_separator.clone(),
                args.element_separator.clone(),
            ) else {
                return Err(Error::new(ErrorKind::InvalidArgument)
                    .with_message("text input requires both separators")
                    .with_hint("Pass --segment-separator and --element-separator."));
            };
            Ok(Document::Text {
                // Trailing newline from shells and editors is not content.
                content: content.trim_end_matches('\n').to_string(),
                segment_separator,
                element_separator,
            })
        }
        Format::Json => {
            let grouped: GroupedContent = serde_json::from_str(&content).map_err(|err| {
                Error::new(ErrorKind::InvalidStructure)
                    .with_message(format!("input is not a grouped JSON object: {err}"))
                    .with_source(err)
            })?;
            Ok(Document::Json { content: grouped })
        }
        Format::Xml => Ok(Document::Xml { content }),
    }
}

fn encode_json(value: &serde_json::Value) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(encode_error)
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("failed to encode output")
        .with_source(err)
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("  hint: {hint}");
        }
        return;
    }

    let value = json!({
        "error": {
            "kind": format!("{:?}", err.kind()),
            "message": err.message(),
            "hint": err.hint(),
        }
    });
    let line = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{line}");
}
