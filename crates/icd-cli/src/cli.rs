//! CLI argument definitions for the `icd` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use icd_model::{CodeForm, FormHint, KindHint};

use icd_cli::render::OutputFormat;

#[derive(Parser)]
#[command(
    name = "icd",
    version,
    about = "ICD-9 / ICD-10 code toolkit",
    long_about = "Convert, validate, condense and explain ICD-9 and ICD-10 diagnosis codes,\n\
                  and assign comorbidity categories to patient records.\n\n\
                  Codes are read from the command line, or one or more per line from stdin."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Prefix log lines with an RFC 3339 timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// TOML file with default parse options and the reference directory.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory with hierarchy/ and comorbidity/ CSV files
    /// (default: $ICD_REFERENCE_DIR, then the embedded data).
    #[arg(long = "reference-dir", value_name = "DIR", global = true)]
    pub reference_dir: Option<PathBuf>,

    /// Result format.
    #[arg(long = "output", short = 'o', value_enum, global = true)]
    pub output: Option<OutputArg>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert codes between short and decimal form.
    Convert(ConvertArgs),

    /// Check codes against the grammar and, optionally, the hierarchy.
    Validate(ValidateArgs),

    /// Split codes into major and minor parts.
    Parse(PartsArgs),

    /// Collapse complete groups of codes to their parent codes.
    Condense(CondenseArgs),

    /// Describe codes using the reference hierarchy.
    Explain(ExplainArgs),

    /// List a code and all of its descendants.
    Children(ChildrenArgs),

    /// List every defined code between two codes.
    Range(RangeArgs),

    /// Sort codes into canonical order.
    Sort(CodeArgs),

    /// Assign comorbidity categories to records read from a CSV file.
    Comorbid(ComorbidArgs),

    /// List the loaded comorbidity maps and their categories.
    Maps(MapsArgs),
}

/// Codes and how to read them.
#[derive(Args)]
pub struct CodeArgs {
    /// Codes to process; read from stdin when omitted.
    #[arg(value_name = "CODE")]
    pub codes: Vec<String>,

    #[command(flatten)]
    pub parse: ParseArgs,
}

/// Parse option overrides.
#[derive(Args, Clone, Copy)]
pub struct ParseArgs {
    /// Classification of the input codes [default: infer].
    ///
    /// Inference cannot tell ICD-9 V and E codes such as V434 or E8500
    /// apart from ICD-10 codes with the same text; those inputs fail unless
    /// `--kind icd9` or `--kind icd10` is given.
    #[arg(long = "kind", short = 'k', value_enum)]
    pub kind: Option<KindArg>,

    /// Representation of the input codes.
    #[arg(long = "form", short = 'f', value_enum)]
    pub form: Option<FormArg>,

    /// Reject codes that break their classification's grammar.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: CodeArgs,

    /// Target representation.
    #[arg(long = "to", value_enum, default_value = "short")]
    pub to: TargetArg,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: CodeArgs,

    /// Also check that codes are defined in the reference hierarchy.
    #[arg(long = "defined")]
    pub defined: bool,
}

#[derive(Args)]
pub struct PartsArgs {
    #[command(flatten)]
    pub input: CodeArgs,

    /// Text shown for an empty minor part.
    #[arg(long = "minor-empty", value_name = "TEXT", default_value = "")]
    pub minor_empty: String,
}

#[derive(Args)]
pub struct CondenseArgs {
    #[command(flatten)]
    pub input: CodeArgs,

    /// Drop codes the hierarchy does not define.
    #[arg(long = "drop-undefined")]
    pub drop_undefined: bool,
}

#[derive(Args)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub input: CodeArgs,

    /// Condense the codes before describing them.
    #[arg(long = "condense")]
    pub condense: bool,
}

#[derive(Args)]
pub struct ChildrenArgs {
    #[command(flatten)]
    pub input: CodeArgs,

    /// Only list billable codes.
    #[arg(long = "billable")]
    pub billable: bool,
}

#[derive(Args)]
pub struct RangeArgs {
    /// First code of the range.
    #[arg(value_name = "START")]
    pub start: String,

    /// Last code of the range; its descendants are included.
    #[arg(value_name = "END")]
    pub end: String,

    #[command(flatten)]
    pub parse: ParseArgs,
}

#[derive(Args)]
pub struct ComorbidArgs {
    /// CSV file with one (id, code) pair per row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Comorbidity map to apply.
    #[arg(long = "map", short = 'm', default_value = "charlson")]
    pub map: String,

    /// Column holding the record id.
    #[arg(long = "id-column", default_value = "id")]
    pub id_column: String,

    /// Column holding the diagnosis code.
    #[arg(long = "code-column", default_value = "code")]
    pub code_column: String,

    /// Add the Charlson index to every row.
    #[arg(long = "score")]
    pub score: bool,

    #[command(flatten)]
    pub parse: ParseArgs,
}

#[derive(Args)]
pub struct MapsArgs {
    /// Only show this map.
    #[arg(value_name = "MAP")]
    pub name: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Icd9,
    Icd10,
    Infer,
}

impl From<KindArg> for KindHint {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Icd9 => KindHint::Icd9,
            KindArg::Icd10 => KindHint::Icd10,
            KindArg::Infer => KindHint::Infer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormArg {
    Short,
    Decimal,
    Infer,
}

impl From<FormArg> for FormHint {
    fn from(form: FormArg) -> Self {
        match form {
            FormArg::Short => FormHint::Short,
            FormArg::Decimal => FormHint::Decimal,
            FormArg::Infer => FormHint::Infer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TargetArg {
    Short,
    Decimal,
}

impl From<TargetArg> for CodeForm {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Short => CodeForm::Short,
            TargetArg::Decimal => CodeForm::Decimal,
        }
    }
}

/// CLI result format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum OutputArg {
    Table,
    Json,
    Plain,
}

impl From<OutputArg> for OutputFormat {
    fn from(output: OutputArg) -> Self {
        match output {
            OutputArg::Table => OutputFormat::Table,
            OutputArg::Json => OutputFormat::Json,
            OutputArg::Plain => OutputFormat::Plain,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
