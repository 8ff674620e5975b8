use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stencil::config::Settings;
use stencil::template::{
    format_value, format_with, placeholders, Bindings, FormatOptions, MissingPolicy, TemplateStore,
};

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "Named-placeholder template formatting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template with the given bindings
    Render(RenderArgs),

    /// Check a template and list its placeholder names
    Check {
        /// Template file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },

    /// List templates from the configured template directory
    List,
}

#[derive(Args)]
struct RenderArgs {
    /// Template file (reads from stdin if neither FILE nor --id is given)
    file: Option<PathBuf>,

    /// Render a stored template by ID instead of reading input
    #[arg(long, conflicts_with_all = ["file", "json"])]
    id: Option<String>,

    /// Bind a placeholder, e.g. --bind name=World (repeatable;
    /// overrides entries from --bindings)
    #[arg(short, long = "bind", value_name = "NAME=VALUE")]
    bind: Vec<String>,

    /// JSON file containing a bindings object
    #[arg(long, value_name = "FILE")]
    bindings: Option<PathBuf>,

    /// Policy for placeholders with no binding
    #[arg(long, value_enum)]
    missing: Option<MissingPolicy>,

    /// Treat the input as a JSON payload template
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::new().context("Failed to load configuration")?;

    match cli.command {
        Command::Render(args) => cmd_render(&settings, args),
        Command::Check { file } => cmd_check(file),
        Command::List => cmd_list(&settings),
    }
}

fn cmd_render(settings: &Settings, args: RenderArgs) -> Result<()> {
    let bindings = collect_bindings(args.bindings.as_deref(), &args.bind)?;
    let options = FormatOptions {
        missing: args.missing.unwrap_or(settings.render.missing),
    };

    if let Some(id) = args.id {
        let store = open_store(settings)?;
        let rendered = store.render_with(&id, &bindings, &options)?;
        println!("{}", rendered);
        return Ok(());
    }

    let input = read_input(args.file.as_deref())?;
    if args.json {
        let payload: serde_json::Value =
            serde_json::from_str(&input).context("Input is not valid JSON")?;
        let rendered = format_value(&payload, &bindings, &options)?;
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        let rendered = format_with(&input, &bindings, &options)?;
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_check(file: Option<PathBuf>) -> Result<()> {
    let input = read_input(file.as_deref())?;
    let names = placeholders(&input)?;

    for name in names {
        println!("{}", name);
    }

    Ok(())
}

fn cmd_list(settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;

    let mut templates = store.list();
    templates.sort_by(|a, b| a.id.cmp(&b.id));

    for template in templates {
        println!("{}\t{}", template.id, template.name);
    }

    Ok(())
}

/// Build a store from the configured template directory
fn open_store(settings: &Settings) -> Result<TemplateStore> {
    let dir = settings
        .templates
        .dir
        .as_ref()
        .context("No template directory configured (set templates.dir or TEMPLATES_DIR)")?;

    let store = TemplateStore::new();
    store
        .load_dir(dir)
        .with_context(|| format!("Failed to load templates from {}", dir.display()))?;

    Ok(store)
}

/// Merge bindings from an optional JSON file and name=value pairs,
/// pairs taking precedence
fn collect_bindings(bindings_file: Option<&Path>, pairs: &[String]) -> Result<Bindings> {
    let mut bindings = match bindings_file {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read bindings file {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Bindings file {} is not valid JSON", path.display()))?;
            Bindings::from_json(&value)?
        }
        None => Bindings::new(),
    };

    for pair in pairs {
        match pair.split_once('=') {
            Some((name, value)) => bindings.insert(name, value),
            None => bail!("Invalid binding '{}', expected NAME=VALUE", pair),
        }
    }

    Ok(bindings)
}

/// Read template text from a file, or from stdin when no file is given
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read template from stdin")?;
            Ok(buffer)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
