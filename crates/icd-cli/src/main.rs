//! ICD code toolkit CLI.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use anyhow::{Context, Result, bail};
use clap::{ColorChoice, Parser};
use icd_cli::commands::{
    assign_comorbidities, condense_codes, convert_codes, explain_codes, find_map, list_children,
    list_maps, list_range, read_codes, read_records, sort_input, split_codes, validate_codes,
};
use icd_cli::config::CliConfig;
use icd_cli::logging::{LogConfig, LogFormat, init_logging};
use icd_cli::render::{OutputFormat, Report, render};
use icd_model::ParseOptions;
use icd_standards::ReferenceData;
use tracing::info;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, CodeArgs, Command, LogFormatArg, LogLevelArg, ParseArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let session = Session::new(cli)?;
    match &cli.command {
        Command::Convert(args) => {
            let (codes, options) = session.input(&args.input)?;
            session.emit(&convert_codes(&codes, &options, args.to.into()))
        }
        Command::Validate(args) => {
            let (codes, options) = session.input(&args.input)?;
            let reference = if args.defined {
                Some(session.reference()?)
            } else {
                None
            };
            let hierarchy = reference.as_ref().map(|reference| &reference.hierarchy);
            session.emit(&validate_codes(&codes, &options, hierarchy))
        }
        Command::Parse(args) => {
            let (codes, options) = session.input(&args.input)?;
            session.emit(&split_codes(&codes, &options, &args.minor_empty))
        }
        Command::Condense(args) => {
            let (codes, options) = session.input(&args.input)?;
            let reference = session.reference()?;
            session.emit(&condense_codes(
                &codes,
                &options,
                &reference.hierarchy,
                args.drop_undefined,
            ))
        }
        Command::Explain(args) => {
            let (codes, options) = session.input(&args.input)?;
            let reference = session.reference()?;
            session.emit(&explain_codes(
                &codes,
                &options,
                &reference.hierarchy,
                args.condense,
            ))
        }
        Command::Children(args) => {
            let (codes, options) = session.input(&args.input)?;
            let reference = session.reference()?;
            session.emit(&list_children(
                &codes,
                &options,
                &reference.hierarchy,
                args.billable,
            ))
        }
        Command::Range(args) => {
            let options = session.parse_options(&args.parse);
            let reference = session.reference()?;
            let report = list_range(&args.start, &args.end, &options, &reference.hierarchy)?;
            session.emit(&report)
        }
        Command::Sort(args) => {
            let (codes, options) = session.input(args)?;
            session.emit(&sort_input(&codes, &options))
        }
        Command::Comorbid(args) => {
            let file = File::open(&args.input)
                .with_context(|| format!("open {}", args.input.display()))?;
            let records = read_records(BufReader::new(file), &args.id_column, &args.code_column)
                .with_context(|| format!("read {}", args.input.display()))?;
            let reference = session.reference()?;
            let map = find_map(&reference, &args.map)?;
            let options = session.parse_options(&args.parse);
            session.emit(&assign_comorbidities(&records, map, &options, args.score)?)
        }
        Command::Maps(args) => {
            let reference = session.reference()?;
            session.emit(&list_maps(&reference, args.name.as_deref())?)
        }
    }
}

/// Flags merged with the optional config file.
struct Session<'a> {
    cli: &'a Cli,
    config: CliConfig,
}

impl<'a> Session<'a> {
    fn new(cli: &'a Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        Ok(Self { cli, config })
    }

    fn parse_options(&self, args: &ParseArgs) -> ParseOptions {
        self.config.parse_options(
            args.kind.map(Into::into),
            args.form.map(Into::into),
            args.strict,
        )
    }

    fn input(&self, args: &CodeArgs) -> Result<(Vec<String>, ParseOptions)> {
        let codes = if args.codes.is_empty() {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                bail!("no codes given; pass them as arguments or on stdin");
            }
            read_codes(stdin.lock())?
        } else {
            args.codes.clone()
        };
        Ok((codes, self.parse_options(&args.parse)))
    }

    fn reference(&self) -> Result<ReferenceData> {
        let config = self
            .config
            .reference_config(self.cli.reference_dir.as_deref());
        let reference = ReferenceData::load(&config).context("load reference data")?;
        info!(
            source = %reference.source,
            codes = reference.hierarchy.len(),
            maps = reference.maps.len(),
            "loaded reference data"
        );
        Ok(reference)
    }

    fn output(&self) -> OutputFormat {
        self.cli
            .output
            .map(Into::into)
            .or(self.config.output)
            .unwrap_or_default()
    }

    /// Print `report` and return the exit code it implies.
    fn emit<R: Report>(&self, report: &R) -> Result<i32> {
        let rendered = render(report, self.output())?;
        if !rendered.is_empty() {
            println!("{rendered}");
        }
        for issue in report.issues() {
            eprintln!("{issue}");
        }
        Ok(i32::from(report.has_failures()))
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.timestamps = cli.log_timestamps;
    config.log_file = cli.log_file.clone();
    config.ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
