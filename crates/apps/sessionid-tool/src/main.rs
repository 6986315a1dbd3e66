mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::ToolConfig;
use serde_json::{json, Value};
use sessionid::{ExtensionBlock, SessionIdError, SessionIdentifier};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sidtool", about = "Create and inspect session identifiers", version)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Assemble an identifier from a core, extensions and a tail.
    Create {
        #[arg(long, default_value = "")]
        core: String,
        #[arg(long = "ext", value_parser = parse_extension)]
        extensions: Vec<(String, String)>,
        #[arg(long, default_value = "")]
        tail: String,
    },
    /// Split an identifier into its parts.
    Parse {
        identifier: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Decode a bare base64 extension block.
    DecodeBlock {
        block: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("sidtool error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ToolConfig::from_path(path)
            .with_context(|| format!("read config {}", path.display()))?,
        None => ToolConfig::default(),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .init();
    if let Some(path) = &cli.config {
        log::debug!(
            "sidtool: loaded config {} ({} default extensions)",
            path.display(),
            config.default_extensions().len()
        );
    }

    match cli.command {
        Command::Create { core, extensions, tail } => {
            let mut block = config.default_extensions();
            block.extend(extensions);
            let encoded = SessionIdentifier::create(&core, &block, &tail)
                .context("create session identifier")?;
            println!("{encoded}");
        }
        Command::Parse { identifier, json } => {
            let sid = SessionIdentifier::parse(&identifier).map_err(rejected)?;
            if json {
                println!("{}", sid_to_json(&sid));
            } else {
                println!("core: {}", sid.core());
                print_extensions(sid.extensions());
                println!("tail: {}", sid.tail());
            }
        }
        Command::DecodeBlock { block, json } => {
            let extensions = ExtensionBlock::from_base64(&block).map_err(rejected)?;
            if json {
                println!("{}", extensions_to_json(&extensions));
            } else {
                print_extensions(&extensions);
            }
        }
    }
    Ok(())
}

fn parse_extension(raw: &str) -> Result<(String, String), String> {
    let (key, value) =
        raw.split_once('=').ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    Ok((key.to_string(), value.to_string()))
}

fn rejected(err: SessionIdError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("rejected input ({kind:?})"))
}

fn print_extensions(extensions: &ExtensionBlock) {
    println!("extensions: {}", extensions.len());
    for (key, value) in extensions.iter() {
        println!("  {key} = {value}");
    }
}

fn extensions_to_json(extensions: &ExtensionBlock) -> Value {
    json!(extensions.as_map())
}

fn sid_to_json(sid: &SessionIdentifier) -> Value {
    json!({
        "core": sid.core(),
        "extensions": extensions_to_json(sid.extensions()),
        "tail": sid.tail(),
    })
}
