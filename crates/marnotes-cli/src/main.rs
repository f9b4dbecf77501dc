//! marnotes CLI — browse a marnotes document server from the terminal.
//!
//! Thin front end over `marnotes-client`: every command drives a
//! [`DocumentBrowser`] and prints what a document browser view would show.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use marnotes_client::{
    ClientConfig, DocumentBrowser, DocumentClient, DocumentId, EncryptionCapability,
    RenderedContent, RouteVariant,
};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Escape codes, blanked out under `--no-color`.
#[derive(Clone, Copy)]
struct Palette {
    reset: &'static str,
    bold: &'static str,
    dim: &'static str,
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    cyan: &'static str,
}

impl Palette {
    fn new(color: bool) -> Self {
        if color {
            Self {
                reset: RESET,
                bold: BOLD,
                dim: DIM,
                red: RED,
                green: GREEN,
                yellow: YELLOW,
                cyan: CYAN,
            }
        } else {
            Self {
                reset: "",
                bold: "",
                dim: "",
                red: "",
                green: "",
                yellow: "",
                cyan: "",
            }
        }
    }
}

// ── CLI structure ────────────────────────────────────────────────────

/// marnotes — browse JSON documents.
#[derive(Parser)]
#[command(
    name = "marnotes",
    version,
    about = "marnotes CLI — list and read documents from a marnotes document server",
    long_about = None,
    after_help = "Environment variables:\n  \
         MARNOTES_HOST        Server host (default: localhost)\n  \
         MARNOTES_JSON_PORT   Server port\n  \
         MARNOTES_LOG         Log filter for diagnostics (default: warn)\n\n\
         Examples:\n  \
         marnotes --port 8080 list\n  \
         marnotes --port 8080 get notes.json\n  \
         marnotes --port 8080 --route documents get notes",
)]
struct Cli {
    /// Document server host.
    #[arg(long, env = "MARNOTES_HOST", default_value = "localhost")]
    host: String,

    /// Document server port.
    #[arg(long, env = "MARNOTES_JSON_PORT")]
    port: Option<String>,

    /// Single-document route the server exposes.
    #[arg(long, value_enum, default_value_t = RouteArg::Doc)]
    route: RouteArg,

    /// Request timeout in seconds (default: none).
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable colored output.
    #[arg(long, default_value = "false")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RouteArg {
    /// `/doc/{name}`
    Doc,
    /// `/documents/{name}`
    Documents,
}

impl From<RouteArg> for RouteVariant {
    fn from(arg: RouteArg) -> Self {
        match arg {
            RouteArg::Doc => Self::Doc,
            RouteArg::Documents => Self::Documents,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the documents on the server.
    List,
    /// Show one document.
    Get {
        /// Document name, with or without `.json`.
        id: String,
        /// Print the JSON compactly, exactly as decoded.
        #[arg(long, default_value = "false")]
        raw: bool,
    },
    /// Check that the server is up.
    Health,
    /// Show the server's encryption public key, if it publishes one.
    Publickey,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let palette = Palette::new(!cli.no_color);
    match run(cli, palette).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let Palette { red, bold, reset, .. } = palette;
            eprintln!("{red}{bold}error:{reset} {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("MARNOTES_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(cli: Cli, p: Palette) -> Result<()> {
    let client = DocumentClient::new(ClientConfig {
        host: cli.host,
        port: cli.port,
        route: cli.route.into(),
        timeout: cli.timeout.map(Duration::from_secs),
        ..Default::default()
    })
    .context("invalid client configuration")?;
    debug!(base_url = client.base_url(), "client ready");

    let mut browser = DocumentBrowser::new(client);

    match cli.command {
        Commands::List => cmd_list(&mut browser, p).await,
        Commands::Get { id, raw } => cmd_get(&mut browser, id.into(), raw, p).await,
        Commands::Health => cmd_health(&browser, p).await,
        Commands::Publickey => {
            cmd_publickey(&mut browser, p).await;
            Ok(())
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

async fn cmd_list(browser: &mut DocumentBrowser, p: Palette) -> Result<()> {
    browser.refresh().await;
    if let Some(msg) = browser.documents.error() {
        return Err(anyhow!("{msg}"));
    }

    let list = browser
        .documents
        .value()
        .ok_or_else(|| anyhow!("document list did not load"))?;

    header(p, &format!("Found {} document{}", list.len(), plural(list.len())));
    if list.is_empty() {
        println!("  {}(none){}", p.dim, p.reset);
    }
    for id in list.iter() {
        println!("  {}├─{} {id}", p.cyan, p.reset);
    }
    Ok(())
}

async fn cmd_get(browser: &mut DocumentBrowser, id: DocumentId, raw: bool, p: Palette) -> Result<()> {
    browser.open(id.clone()).await;
    if let Some(msg) = browser.content.error() {
        return Err(anyhow!("{msg}"));
    }

    if raw {
        let content = browser
            .content
            .value()
            .ok_or_else(|| anyhow!("document did not load"))?;
        println!("{content}");
        return Ok(());
    }

    let rendered = browser
        .rendered()
        .ok_or_else(|| anyhow!("document did not load"))?;

    let kind = match &rendered {
        RenderedContent::StructuredDocument(_) => "rich-text document",
        RenderedContent::OpaqueJson(_) => "JSON",
    };
    header(p, &format!("Content of {id} {}({kind}){}", p.dim, p.reset));
    println!("{}", rendered.to_text());
    Ok(())
}

async fn cmd_health(browser: &DocumentBrowser, p: Palette) -> Result<()> {
    let health = browser.client().health().await;
    if !health.ok {
        return Err(anyhow!(
            "server at {} is not responding",
            browser.client().base_url()
        ));
    }

    println!(
        "{}{}✓{} {} {}({} ms){}",
        p.green,
        p.bold,
        p.reset,
        health.status.as_deref().unwrap_or("up"),
        p.dim,
        health.latency_ms,
        p.reset
    );
    if let Some(dir) = &health.docs_dir {
        kv_line(p, "documents", dir);
    }
    Ok(())
}

async fn cmd_publickey(browser: &mut DocumentBrowser, p: Palette) {
    match browser.probe_capabilities().await {
        EncryptionCapability::PublicKey(pem) => print!("{pem}"),
        EncryptionCapability::Unsupported => {
            println!(
                "{}{}⚠{} {}encryption unsupported by this server{}",
                p.yellow, p.bold, p.reset, p.yellow, p.reset
            );
        }
    }
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(p: Palette, title: &str) {
    println!("{}{}{title}{}", p.bold, p.cyan, p.reset);
    println!("{}─────────────────────────────────────────{}", p.dim, p.reset);
}

fn kv_line(p: Palette, key: &str, value: &str) {
    println!("  {}{key:<12}{} {value}", p.dim, p.reset);
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
