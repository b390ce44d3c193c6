//! markdown-docgen - structured multi-locale documentation generator

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use markdown_docgen_config::{Config, DEFAULT_CONFIG_FILE};
use markdown_docgen_engine::{
    BlockType, DocStore, GenerateOptions, Generator, generate::STRUCTURED_DOCS_FILE,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "markdown-docgen")]
#[command(version, about = "Generate structured documentation data from per-locale markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    markdown-docgen                              Generate using ./docgen.toml
    markdown-docgen generate --strict            Fail on cross-locale mismatches
    markdown-docgen toc quick-start              Table of contents of a document
    markdown-docgen search quick-start install   Search within a document
    markdown-docgen section api hooks --type code")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the configuration file. Also via `DOCGEN_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "DOCGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Show debug output, including the per-section consistency report
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the docs tree and write the generated artifacts (default)
    Generate(GenerateArgs),
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the table of contents of a generated document as JSON
    Toc {
        doc: String,
        #[command(flatten)]
        lookup: LookupArgs,
    },
    /// Search a generated document and print the matches as JSON
    Search {
        doc: String,
        query: String,
        #[command(flatten)]
        lookup: LookupArgs,
    },
    /// Print a section, or its blocks of one type, as JSON
    Section {
        doc: String,
        section: String,
        /// Only blocks of this type (paragraph, code, table, taskList, ...)
        #[arg(long = "type", value_name = "TYPE")]
        block_type: Option<BlockType>,
        #[command(flatten)]
        lookup: LookupArgs,
    },
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Directory holding one subdirectory per locale
    #[arg(long, value_name = "DIR")]
    docs_dir: Option<PathBuf>,
    /// Output directory for the JSON artifacts
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Output directory for docs.ts
    #[arg(long, value_name = "DIR")]
    types_dir: Option<PathBuf>,
    /// Locales to process
    #[arg(long, value_delimiter = ',', value_name = "LOCALES")]
    locales: Option<Vec<String>>,
    /// Locale whose titles define the section ids
    #[arg(long, value_name = "LOCALE")]
    master_locale: Option<String>,
    /// Fail when sections differ across locales
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Locale to read; falls back to the master locale
    #[arg(long, short = 'l')]
    locale: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if let Some(Command::Init { force }) = &cli.command {
        return init_config(&config_path, *force);
    }

    let config = match Config::load_from_path(&config_path)? {
        Some(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            config
        }
        None => {
            log::debug!("No config at {}, using defaults", config_path.display());
            Config::default()
        }
    };

    match cli.command {
        None => generate(config, GenerateArgs::default()),
        Some(Command::Generate(args)) => generate(config, args),
        Some(Command::Init { .. }) => Ok(()),
        Some(Command::Toc { doc, lookup }) => {
            let store = open_store(&config, lookup.locale.as_deref())?;
            print_json(&store.list_table_of_contents(&doc))
        }
        Some(Command::Search { doc, query, lookup }) => {
            let store = open_store(&config, lookup.locale.as_deref())?;
            print_json(&store.search_within_document(&doc, &query))
        }
        Some(Command::Section {
            doc,
            section,
            block_type,
            lookup,
        }) => {
            let store = open_store(&config, lookup.locale.as_deref())?;
            match block_type {
                Some(block_type) => {
                    print_json(&store.get_content_blocks_of_type(&doc, &section, block_type))
                }
                None => match store.get_section(&doc, &section) {
                    Some(section) => print_json(section),
                    None => bail!("Section '{section}' not found in document '{doc}'"),
                },
            }
        }
    }
}

fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists; use --force to overwrite",
            config_path.display()
        );
    }
    Config::default().save_to_path(config_path)?;
    log::info!("Wrote {}", config_path.display());
    Ok(())
}

fn generate(mut config: Config, args: GenerateArgs) -> Result<()> {
    if let Some(dir) = args.docs_dir {
        config.docs_dir = dir;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.types_dir {
        config.types_dir = dir;
    }
    if let Some(locales) = args.locales {
        config.locales = locales;
    }
    if let Some(master) = args.master_locale {
        config.master_locale = master;
    }
    config.strict |= args.strict;
    config.validate()?;

    let generator = Generator::new(options_from_config(&config));
    let (generated, _) = generator.run()?;

    if !generated.report.is_consistent() {
        log::warn!(
            "{} consistency warnings; rerun with --verbose for the full report",
            generated.report.warnings.len()
        );
    }
    Ok(())
}

fn options_from_config(config: &Config) -> GenerateOptions {
    GenerateOptions {
        docs_dir: config.docs_dir.clone(),
        data_dir: config.data_dir.clone(),
        types_dir: config.types_dir.clone(),
        locales: config.locales.clone(),
        master_locale: config.master_locale.clone(),
        strict: config.strict,
        words_per_minute: config.words_per_minute,
    }
}

fn open_store(config: &Config, locale: Option<&str>) -> Result<DocStore> {
    let path = config.data_dir.join(STRUCTURED_DOCS_FILE);
    let json = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "Failed to read {}; run `markdown-docgen generate` first",
            path.display()
        )
    })?;
    let store = DocStore::from_json(&json, &config.master_locale)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(match locale {
        Some(locale) => store.with_locale(locale),
        None => store,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
