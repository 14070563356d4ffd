// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use mse_cli::plot::SvgProfilePlot;
use mse_cli::{parse_csv_data, run_analysis};
use mse_core::{MseError, SignalView};
use mse_estimators::{DEFAULT_SD_FRACTION, TolerancePolicy, katz_fd};
use mse_multiscale::{
    CoarseMethod, EstimatorKind, EvalHooks, MultiscaleConfig, MultiscaleResult, ScalePolicy,
    Variant,
};
use serde::Serialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

struct Cli {
    command: Command,
}

enum Command {
    Analyze(AnalyzeArgs),
    Katz(KatzArgs),
}

#[derive(Debug)]
struct AnalyzeArgs {
    scale: ScalePolicy,
    dimension: usize,
    tolerance: TolerancePolicy,
    estimator: EstimatorKind,
    coarse: CoarseMethod,
    composite: bool,
    refined: bool,
    fuzzy: bool,
    input: PathBuf,
    output: Option<PathBuf>,
    plot: Option<PathBuf>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            scale: ScalePolicy::Auto,
            dimension: 2,
            tolerance: TolerancePolicy::SdFraction(DEFAULT_SD_FRACTION),
            estimator: EstimatorKind::Sample,
            coarse: CoarseMethod::Decimation,
            composite: false,
            refined: false,
            fuzzy: false,
            input: PathBuf::new(),
            output: None,
            plot: None,
        }
    }
}

#[derive(Debug, Default)]
struct KatzArgs {
    input: PathBuf,
    output: Option<PathBuf>,
}

#[derive(Debug)]
enum CliError {
    Mse(MseError),
    Io {
        context: String,
        source: std::io::Error,
    },
    Json {
        context: String,
        source: serde_json::Error,
    },
    InvalidInput(String),
}

impl CliError {
    fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Mse(err) => err.code(),
            Self::InvalidInput(_) => "invalid_input",
            Self::Io { .. } => "io_error",
            Self::Json { .. } => "json_error",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mse(err) => write!(f, "{err}"),
            Self::Io { context, source } => write!(f, "{context}: {source}"),
            Self::Json { context, source } => write!(f, "{context}: {source}"),
            Self::InvalidInput(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mse(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<MseError> for CliError {
    fn from(value: MseError) -> Self {
        Self::Mse(value)
    }
}

#[derive(Serialize)]
struct InputSummary {
    path: String,
    n: usize,
    d: usize,
}

#[derive(Serialize)]
struct AnalyzeOutput {
    command: &'static str,
    input: InputSummary,
    variant: &'static str,
    estimator: &'static str,
    coarse: &'static str,
    fuzzy: bool,
    result: MultiscaleResult,
}

#[derive(Serialize)]
struct KatzOutput {
    command: &'static str,
    input: InputSummary,
    katz_fd: f64,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: String,
    message: String,
}

fn main() {
    if let Err(err) = run() {
        emit_structured_error(&err);
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let Some(cli) = parse_cli_from_env()? else {
        return Ok(());
    };

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Katz(args) => handle_katz(args),
    }
}

fn parse_cli_from_env() -> Result<Option<Cli>, CliError> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() || matches!(args[0].as_str(), "-h" | "--help") {
        print_root_help();
        return Ok(None);
    }
    if matches!(args[0].as_str(), "-V" | "--version") {
        print_version();
        return Ok(None);
    }

    let command_name = args[0].as_str();
    let rest = &args[1..];

    if rest.iter().any(|arg| matches!(arg.as_str(), "-h" | "--help")) {
        print_command_help(command_name)?;
        return Ok(None);
    }

    let command = match command_name {
        "analyze" => Command::Analyze(parse_analyze_args(rest)?),
        "katz" => Command::Katz(parse_katz_args(rest)?),
        _ => {
            return Err(CliError::invalid_input(format!(
                "unknown command '{command_name}'; expected one of: analyze, katz"
            )));
        }
    };

    Ok(Some(Cli { command }))
}

fn parse_analyze_args(tokens: &[String]) -> Result<AnalyzeArgs, CliError> {
    let mut args = AnalyzeArgs::default();
    let mut idx = 0usize;
    while idx < tokens.len() {
        let (flag, inline_value) = split_flag(tokens[idx].as_str())?;
        match flag {
            "--scale" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.scale = parse_scale_arg(raw.as_str())?;
            }
            "--dimension" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.dimension = parse_usize_arg(raw.as_str(), flag)?;
            }
            "--tolerance" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.tolerance = parse_tolerance_arg(raw.as_str())?;
            }
            "--estimator" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.estimator = parse_estimator_arg(raw.as_str())?;
            }
            "--coarse" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.coarse = parse_coarse_arg(raw.as_str())?;
            }
            "--composite" => {
                ensure_no_inline_value(flag, inline_value)?;
                args.composite = true;
            }
            "--refined" => {
                ensure_no_inline_value(flag, inline_value)?;
                args.refined = true;
            }
            "--fuzzy" => {
                ensure_no_inline_value(flag, inline_value)?;
                args.fuzzy = true;
            }
            "--input" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.input = PathBuf::from(raw);
            }
            "--output" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.output = Some(PathBuf::from(raw));
            }
            "--plot" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.plot = Some(PathBuf::from(raw));
            }
            other => {
                return Err(CliError::invalid_input(format!(
                    "unknown analyze option '{other}'"
                )));
            }
        }
        idx += 1;
    }

    if args.input.as_os_str().is_empty() {
        return Err(CliError::invalid_input("analyze requires --input <path>"));
    }

    Ok(args)
}

fn parse_katz_args(tokens: &[String]) -> Result<KatzArgs, CliError> {
    let mut args = KatzArgs::default();
    let mut idx = 0usize;
    while idx < tokens.len() {
        let (flag, inline_value) = split_flag(tokens[idx].as_str())?;
        match flag {
            "--input" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.input = PathBuf::from(raw);
            }
            "--output" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                args.output = Some(PathBuf::from(raw));
            }
            other => {
                return Err(CliError::invalid_input(format!(
                    "unknown katz option '{other}'"
                )));
            }
        }
        idx += 1;
    }

    if args.input.as_os_str().is_empty() {
        return Err(CliError::invalid_input("katz requires --input <path>"));
    }

    Ok(args)
}

fn parse_scale_arg(raw: &str) -> Result<ScalePolicy, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "default" => Ok(ScalePolicy::Auto),
        "max" => Ok(ScalePolicy::Max),
        other => {
            if let Ok(bound) = other.parse::<usize>() {
                return Ok(ScalePolicy::UpTo(bound));
            }
            if other.contains(',') {
                let scales = other
                    .split(',')
                    .map(|part| {
                        part.trim().parse::<usize>().map_err(|_| {
                            CliError::invalid_input(format!(
                                "invalid scale entry '{part}' in --scale list"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(ScalePolicy::Explicit(scales));
            }
            Err(CliError::invalid_input(format!(
                "invalid --scale '{raw}'; expected default, max, an integer, or a comma list"
            )))
        }
    }
}

fn parse_tolerance_arg(raw: &str) -> Result<TolerancePolicy, CliError> {
    if raw.eq_ignore_ascii_case("sd") {
        return Ok(TolerancePolicy::SdFraction(DEFAULT_SD_FRACTION));
    }
    raw.parse::<f64>()
        .map(TolerancePolicy::Fixed)
        .map_err(|_| {
            CliError::invalid_input(format!(
                "invalid --tolerance '{raw}'; expected 'sd' or a number"
            ))
        })
}

fn parse_estimator_arg(raw: &str) -> Result<EstimatorKind, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "sample" => Ok(EstimatorKind::Sample),
        "approximate" => Ok(EstimatorKind::Approximate),
        _ => Err(CliError::invalid_input(format!(
            "invalid --estimator '{raw}'; expected one of: sample, approximate"
        ))),
    }
}

fn parse_coarse_arg(raw: &str) -> Result<CoarseMethod, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "decimation" => Ok(CoarseMethod::Decimation),
        "rolling" => Ok(CoarseMethod::RollingAverage),
        "interpolate" => Ok(CoarseMethod::Interpolation),
        _ => Err(CliError::invalid_input(format!(
            "invalid --coarse '{raw}'; expected one of: decimation, rolling, interpolate"
        ))),
    }
}

fn split_flag(token: &str) -> Result<(&str, Option<String>), CliError> {
    if !token.starts_with("--") {
        return Err(CliError::invalid_input(format!(
            "unexpected positional argument '{token}'; expected --flag value"
        )));
    }
    if let Some((flag, value)) = token.split_once('=') {
        return Ok((flag, Some(value.to_string())));
    }
    Ok((token, None))
}

fn take_flag_value(
    flag: &str,
    inline_value: Option<String>,
    tokens: &[String],
    idx: &mut usize,
) -> Result<String, CliError> {
    if let Some(value) = inline_value {
        return Ok(value);
    }

    *idx += 1;
    let value = tokens
        .get(*idx)
        .ok_or_else(|| CliError::invalid_input(format!("{flag} requires a value")))?;
    if value.starts_with("--") {
        return Err(CliError::invalid_input(format!(
            "{flag} requires a value, but got option '{value}'"
        )));
    }
    Ok(value.clone())
}

fn ensure_no_inline_value(flag: &str, inline_value: Option<String>) -> Result<(), CliError> {
    if inline_value.is_some() {
        return Err(CliError::invalid_input(format!(
            "{flag} does not accept a value"
        )));
    }
    Ok(())
}

fn parse_usize_arg(raw: &str, flag: &str) -> Result<usize, CliError> {
    raw.parse::<usize>().map_err(|_| {
        CliError::invalid_input(format!(
            "{flag} expects a non-negative integer, got '{raw}'"
        ))
    })
}

fn print_version() {
    println!("mse {}", env!("CARGO_PKG_VERSION"));
}

fn print_root_help() {
    println!(
        "mse {}\n\nUSAGE:\n  mse <COMMAND> [OPTIONS]\n\nCOMMANDS:\n  analyze  Multiscale entropy of a CSV series\n  katz     Katz fractal dimension of a CSV series\n\nGLOBAL OPTIONS:\n  -h, --help      Show help\n  -V, --version   Show version\n\nRun 'mse <COMMAND> --help' for subcommand options.",
        env!("CARGO_PKG_VERSION")
    );
}

fn print_command_help(command: &str) -> Result<(), CliError> {
    match command {
        "analyze" => {
            println!(
                "USAGE:\n  mse analyze --input <path> [OPTIONS]\n\nOPTIONS:\n  --scale <default|max|N|s1,s2,...>        Default: default\n  --dimension <m>                          Default: 2\n  --tolerance <sd|float>                   Default: sd (0.2 x signal SD)\n  --estimator <sample|approximate>         Default: sample\n  --coarse <decimation|rolling|interpolate> Default: decimation\n  --composite                              Composite (CMSE) averaging\n  --refined                                Refined composite (RCMSE); implies composite structure\n  --fuzzy                                  Fuzzy membership inside the estimator\n  --input <path>                           Required (.csv)\n  --output <path>                          Write JSON output to file\n  --plot <path>                            Render the profile to an SVG file"
            );
            Ok(())
        }
        "katz" => {
            println!(
                "USAGE:\n  mse katz --input <path> [OPTIONS]\n\nOPTIONS:\n  --input <path>                           Required (.csv)\n  --output <path>                          Write JSON output to file"
            );
            Ok(())
        }
        _ => Err(CliError::invalid_input(format!(
            "unknown command '{command}'; expected one of: analyze, katz"
        ))),
    }
}

struct LoadedSeries {
    path: PathBuf,
    values: Vec<f64>,
    n: usize,
    d: usize,
}

impl LoadedSeries {
    fn as_view(&self) -> Result<SignalView<'_>, CliError> {
        SignalView::new(self.values.as_slice(), self.n, self.d).map_err(CliError::from)
    }

    fn summary(&self) -> InputSummary {
        InputSummary {
            path: self.path.display().to_string(),
            n: self.n,
            d: self.d,
        }
    }
}

fn load_series(path: &Path) -> Result<LoadedSeries, CliError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CliError::io(format!("failed to read '{}'", path.display()), source))?;
    let (values, n, d) = parse_csv_data(raw.as_str())?;
    Ok(LoadedSeries {
        path: path.to_path_buf(),
        values,
        n,
        d,
    })
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let input = load_series(args.input.as_path())?;
    let view = input.as_view()?;

    let config = MultiscaleConfig {
        scales: args.scale.clone(),
        dimension: args.dimension,
        tolerance: args.tolerance,
        estimator: args.estimator,
        coarse: args.coarse,
        variant: Variant::from_flags(args.composite, args.refined),
        fuzzy: args.fuzzy,
    };

    let plot_sink = args.plot.as_ref().map(SvgProfilePlot::new);
    let mut hooks = EvalHooks::new();
    if let Some(sink) = plot_sink.as_ref() {
        hooks = hooks.with_profile_sink(sink);
    }

    let result = run_analysis(&view, &config, &hooks)?;

    write_json_output(
        &AnalyzeOutput {
            command: "analyze",
            input: input.summary(),
            variant: config.variant.as_str(),
            estimator: config.estimator.as_str(),
            coarse: config.coarse.as_str(),
            fuzzy: config.fuzzy,
            result,
        },
        args.output.as_deref(),
    )
}

fn handle_katz(args: KatzArgs) -> Result<(), CliError> {
    let input = load_series(args.input.as_path())?;
    let view = input.as_view()?;
    let samples = view.require_univariate()?;
    let kfd = katz_fd(samples)?;

    write_json_output(
        &KatzOutput {
            command: "katz",
            input: input.summary(),
            katz_fd: kfd,
        },
        args.output.as_deref(),
    )
}

fn write_json_output<T: Serialize>(payload: &T, output: Option<&Path>) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(payload)
        .map_err(|source| CliError::json("failed to serialize output", source))?;

    match output {
        Some(path) => fs::write(path, rendered.as_bytes()).map_err(|source| {
            CliError::io(format!("failed to write '{}'", path.display()), source)
        })?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn emit_structured_error(err: &CliError) {
    let envelope = ErrorEnvelope {
        error: ErrorPayload {
            code: err.code().to_string(),
            message: err.to_string(),
        },
    };
    match serde_json::to_string(&envelope) {
        Ok(rendered) => eprintln!("{rendered}"),
        Err(_) => eprintln!("{{\"error\":{{\"code\":\"{}\"}}}}", err.code()),
    }
}
