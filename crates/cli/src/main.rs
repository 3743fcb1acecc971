// ABOUTME: CLI binary for the Vitrine AI-response parser.
// ABOUTME: Reads capture payloads from files or stdin and prints detection or normalized output.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_parser::{ParseOptions, ParsedResponse, ProviderKind};

#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Detect, clean, and normalize captured AI-chat responses")]
struct Args {
    /// Capture payload file(s), JSON or raw text. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<String>,

    /// Force a provider instead of auto-detecting (CHATGPT, GEMINI, PERPLEXITY,
    /// COPILOT, AIOVERVIEW, AIMODE, GROK)
    #[arg(long)]
    provider: Option<String>,

    /// Print detection results instead of parsing
    #[arg(long)]
    detect: bool,

    /// With --detect, list every candidate provider with its confidence
    #[arg(long, requires = "detect")]
    all: bool,

    /// Rewrite or collapse hyperlinks in the output
    #[arg(long)]
    remove_links: bool,

    /// Strip header chrome even where the provider default keeps it
    #[arg(long, conflicts_with = "keep_header")]
    remove_header: bool,

    /// Keep header chrome even where the provider default strips it
    #[arg(long)]
    keep_header: bool,

    /// Strip footer/composer chrome even where the provider default keeps it
    #[arg(long, conflicts_with = "keep_footer")]
    remove_footer: bool,

    /// Keep footer/composer chrome even where the provider default strips it
    #[arg(long)]
    keep_footer: bool,

    /// Strip sidebar chrome
    #[arg(long)]
    remove_sidebar: bool,

    /// Invert the provider's default color scheme
    #[arg(long)]
    invert_colors: bool,

    /// Override the injected <base> target (default: provider origin)
    #[arg(long)]
    base_url: Option<String>,

    /// Output format: json (default), html, text
    #[arg(short = 'f', long = "format", default_value = "json")]
    format: String,

    /// Wrap fragment HTML output in a minimal sandboxed document
    #[arg(long)]
    wrap: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

enum OutputFormat {
    Json,
    Html,
    Text,
}

fn parse_format(format: &str) -> OutputFormat {
    match format.to_lowercase().as_str() {
        "html" => OutputFormat::Html,
        "text" | "txt" => OutputFormat::Text,
        _ => OutputFormat::Json,
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("VITRINE_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let forced = match args.provider.as_deref().map(str::parse::<ProviderKind>) {
        Some(Ok(kind)) => Some(kind),
        Some(Err(e)) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
        None => None,
    };

    let parser = vitrine_parser::Parser::new();

    if args.detect {
        run_detect(&parser, &args)
    } else {
        run_parse(&parser, &args, forced)
    }
}

fn run_detect(parser: &vitrine_parser::Parser, args: &Args) -> ExitCode {
    let mut outputs = Vec::new();
    let mut had_error = false;

    for target in &args.files {
        let payload = match load_payload(target) {
            Ok(payload) => payload,
            Err(e) => {
                eprintln!("error reading {}: {}", target, e);
                had_error = true;
                continue;
            }
        };

        if args.all {
            let ranked = parser.detect_all_providers(&payload);
            if ranked.is_empty() {
                had_error = true;
            }
            outputs.push(serde_json::to_string_pretty(&ranked).unwrap());
        } else {
            let detection = vitrine_parser::detect::detect(&payload);
            if detection.is_none() {
                had_error = true;
            }
            outputs.push(serde_json::to_string_pretty(&detection).unwrap());
        }
    }

    write_output(outputs, args, had_error)
}

fn run_parse(
    parser: &vitrine_parser::Parser,
    args: &Args,
    forced: Option<ProviderKind>,
) -> ExitCode {
    let options = build_options(args);
    let mut results: Vec<ParsedResponse> = Vec::new();
    let mut had_error = false;

    for target in &args.files {
        let payload = match load_payload(target) {
            Ok(payload) => payload,
            Err(e) => {
                eprintln!("error reading {}: {}", target, e);
                had_error = true;
                continue;
            }
        };

        let parsed = match forced {
            Some(kind) => match parser.parse_with_provider(&payload, kind, &options) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("error parsing {}: {}", target, e);
                    had_error = true;
                    continue;
                }
            },
            None => parser.parse(&payload, &options),
        };

        match parsed {
            Some(parsed) => results.push(parsed),
            None => {
                eprintln!("no content parsed from {}", target);
                had_error = true;
            }
        }
    }

    write_output(format_results(&results, args), args, had_error)
}

fn build_options(args: &Args) -> ParseOptions {
    ParseOptions {
        remove_links: args.remove_links,
        remove_header: tri_state(args.remove_header, args.keep_header),
        remove_footer: tri_state(args.remove_footer, args.keep_footer),
        remove_sidebar: args.remove_sidebar,
        invert_colors: args.invert_colors,
        base_url: args.base_url.clone(),
        ..Default::default()
    }
}

fn tri_state(remove: bool, keep: bool) -> Option<bool> {
    if remove {
        Some(true)
    } else if keep {
        Some(false)
    } else {
        None
    }
}

/// Read a payload from a file or stdin; JSON first, raw text as a fallback.
fn load_payload(target: &str) -> Result<Value> {
    let raw = if target == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(target)?
    };

    Ok(serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw)))
}

fn format_results(results: &[ParsedResponse], args: &Args) -> Vec<String> {
    if results.is_empty() {
        return Vec::new();
    }
    match parse_format(&args.format) {
        OutputFormat::Json => {
            let rendered = if results.len() == 1 {
                serde_json::to_string_pretty(&results[0]).unwrap()
            } else {
                serde_json::to_string_pretty(results).unwrap()
            };
            vec![rendered]
        }
        OutputFormat::Html => results
            .iter()
            .map(|parsed| html_output(parsed, args.wrap))
            .collect(),
        OutputFormat::Text => results.iter().map(text_output).collect(),
    }
}

fn html_output(parsed: &ParsedResponse, wrap: bool) -> String {
    if wrap && !vitrine_parser::sanitize::is_full_document(&parsed.html) {
        vitrine_parser::wrap_fragment(&parsed.html)
    } else {
        parsed.html.clone()
    }
}

/// Plain-text rendering: the extracted text when present, otherwise the
/// visible text of the cleaned markup.
fn text_output(parsed: &ParsedResponse) -> String {
    match parsed.text.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => vitrine_parser::sanitize::visible_text(&parsed.html),
    }
}

fn write_output(outputs: Vec<String>, args: &Args, mut had_error: bool) -> ExitCode {
    if !outputs.is_empty() {
        let joined = outputs.join("\n\n");
        if let Some(path) = &args.output {
            if let Err(e) = fs::write(path, &joined) {
                eprintln!("error writing to {:?}: {}", path, e);
                had_error = true;
            }
        } else {
            println!("{}", joined);
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
