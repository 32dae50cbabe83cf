// SPDX-License-Identifier: PMPL-1.0-or-later

//! ltf: inspect, validate and query LTF localization files

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use ltf_engine::config::Config;
use ltf_engine::i18n::{Language, LanguageTag};
use ltf_engine::localization::Localization;
use ltf_engine::ltf::LtfFile;
use ltf_engine::report::{self, DocumentReport, ReportFormatter, ReportOutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ltf")]
#[command(version)]
#[command(about = "Validate and query LTF localization text files")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (JSON or YAML); defaults to ltf.yaml if present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files and report format errors
    Check {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Print one entry's text
    Get {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "ID")]
        id: String,

        /// Language tag, e.g. `en` or `en.formal`
        #[arg(value_name = "TAG")]
        tag: String,

        /// Build a lazy byte-offset index instead of a table
        #[arg(long)]
        lazy: bool,
    },

    /// Dump a parsed file
    Dump {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep only this language
        #[arg(short, long)]
        lang: Option<String>,

        /// Build a lazy byte-offset index instead of a table
        #[arg(long)]
        lazy: bool,

        /// Serialize instead of printing a summary
        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        /// Output report to file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported languages
    Langs,

    /// Look up an id across the files named in the configuration
    Lookup {
        #[arg(value_name = "ID")]
        id: String,

        /// Override the configured language
        #[arg(short, long)]
        lang: Option<String>,

        /// Dialect variant, e.g. `formal`
        #[arg(long)]
        variant: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_language(code: &str) -> Result<Language> {
    code.parse::<Language>().map_err(|err| anyhow!(err))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let formatter = ReportFormatter::new();

    match cli.command {
        Commands::Check { files } => {
            let results: Vec<_> = files.iter().map(|path| report::check_file(path)).collect();
            formatter.print_checks(&results);
            let failed = results.iter().filter(|r| !r.passed()).count();
            if failed > 0 {
                return Err(anyhow!("{} file(s) failed to parse", failed));
            }
        }

        Commands::Get { file, id, tag, lazy } => {
            let tag: LanguageTag = tag.parse()?;
            let mut ltf = LtfFile::prepare(&file)
                .with_context(|| format!("loading {}", file.display()))?;
            if lazy {
                ltf.create_index(tag.language)?;
            } else {
                ltf.create_map(tag.language)?;
            }
            println!("{}", ltf.text(&id, &tag)?);
        }

        Commands::Dump {
            file,
            lang,
            lazy,
            format,
            output,
        } => {
            let language = lang.as_deref().map(parse_language).transpose()?;
            let mut ltf = LtfFile::prepare(&file)
                .with_context(|| format!("loading {}", file.display()))?;
            match (lazy, language) {
                (false, None) => ltf.create_map_all()?,
                (false, Some(language)) => ltf.create_map(language)?,
                (true, None) => ltf.create_index_all()?,
                (true, Some(language)) => ltf.create_index(language)?,
            }
            let document = DocumentReport::from_file(&ltf)?;

            match (format, output) {
                (Some(format), Some(path)) => formatter.save(&document, format, &path)?,
                (None, Some(path)) => {
                    let format = path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .and_then(ReportOutputFormat::parse)
                        .unwrap_or(ReportOutputFormat::Json);
                    formatter.save(&document, format, &path)?;
                }
                (Some(format), None) => println!("{}", format.serialize(&document)?),
                (None, None) => formatter.print_document(&document),
            }
            ltf.close()?;
        }

        Commands::Langs => formatter.print_languages(),

        Commands::Lookup { id, lang, variant } => {
            let mut config = Config::load_or_default(cli.config.as_deref())?;
            if let Some(base) = cli.config.as_deref().and_then(|p| p.parent()) {
                config.resolve_paths(base);
            }
            if let Some(code) = lang.as_deref() {
                config.language = parse_language(code)?;
            }
            if config.files.is_empty() && config.directories.is_empty() {
                return Err(anyhow!(
                    "no localization files configured (set `files` or `directories` in the config)"
                ));
            }

            let mut localization = Localization::from_config(&config);
            let summary = localization.load_config(&config);
            for (path, err) in &summary.failed {
                eprintln!("skipped {}: {}", path.display(), err);
            }

            let text = match variant.as_deref() {
                Some(variant) => localization.get_variant(&id, variant)?,
                None => localization.get(&id)?,
            };
            println!("{}", text);
        }
    }

    Ok(())
}
