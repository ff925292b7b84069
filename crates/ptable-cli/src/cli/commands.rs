use super::CliError;
use super::helpers::{load_normalize_options, read_formula_file};
use anyhow::Context;
use ptable_core::ElementRegistry;
use ptable_core::composition::{CountInput, CountMode, CountOptions, count_elements};
use ptable_core::data::{HeatTable, MissingStrategy};
use ptable_core::heat::{ColorBounds, HeatMode};
use ptable_core::serialization::{TableReport, read_heat_input, render_human_summary};
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct TableArgs {
    /// Heat input JSON: a mapping, a `{name, index, data}` series or a split-orient frame
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// JSON file with normalization options; flags below take precedence
    #[arg(long, value_name = "OPTIONS")]
    config: Option<PathBuf>,

    /// How NaN values are replaced
    #[arg(long, value_name = "zero|mean")]
    missing_strategy: Option<MissingStrategy>,

    /// Do not scan for NaN values
    #[arg(long)]
    no_check_missing: bool,

    /// Do not scan for infinite values
    #[arg(long)]
    no_check_infinity: bool,

    /// Divide every value by the table total
    #[arg(long)]
    normalize: bool,

    /// Element symbol to remove; repeatable
    #[arg(long = "drop", value_name = "SYMBOL")]
    drop: Vec<String>,

    /// Scale values before the colour range is computed
    #[arg(long, value_name = "value|fraction|percent", default_value = "value")]
    heat_mode: HeatMode,

    /// Colour range in log10 space
    #[arg(long)]
    log: bool,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct CountArgs {
    /// Chemical formulas such as `Fe2O3` or `Al(NiB)2`
    #[arg(value_name = "FORMULA")]
    formulas: Vec<String>,

    /// File with one formula per line
    #[arg(long)]
    file: Option<PathBuf>,

    /// element, fractional or reduced
    #[arg(long, default_value = "element")]
    mode: CountMode,

    /// Element symbol to leave out of the result; repeatable
    #[arg(long, value_name = "SYMBOL")]
    exclude: Vec<String>,

    /// Count reported for elements that never occur
    #[arg(long, default_value_t = 0.0, conflicts_with = "no_fill")]
    fill_value: f64,

    /// Only report elements that occur
    #[arg(long)]
    no_fill: bool,
}

pub(super) fn run_table_command(args: TableArgs) -> Result<i32, CliError> {
    let mut options = load_normalize_options(args.config.as_deref())?;
    if let Some(strategy) = args.missing_strategy {
        options.missing_strategy = strategy;
    }
    if args.no_check_missing {
        options.check_missing = false;
    }
    if args.no_check_infinity {
        options.check_infinity = false;
    }
    if args.normalize {
        options.normalize = true;
    }

    let input = read_heat_input(&args.input).map_err(CliError::Compute)?;
    let mut table = HeatTable::new(input, &options).map_err(CliError::Compute)?;
    if !args.drop.is_empty() {
        table.drop_elements(&args.drop);
    }
    table
        .apply_heat_mode(args.heat_mode)
        .map_err(CliError::Compute)?;

    let bounds = match table.summary() {
        Some(_) => Some(
            ColorBounds::resolve(table.values(), args.heat_mode, args.log, (None, None))
                .map_err(CliError::Compute)?,
        ),
        None => None,
    };

    println!("{}", render_human_summary(&table));
    if let Some(bounds) = bounds {
        let scale = if bounds.log { "log10" } else { "linear" };
        println!("Color range ({scale}): {} .. {}", bounds.lower, bounds.upper);
    }

    if let Some(report_path) = &args.report {
        let report = TableReport::from_table(&table);
        let report = match bounds {
            Some(bounds) => report.with_color_bounds(bounds),
            None => report,
        };
        report.write(report_path).map_err(CliError::Compute)?;
        info!(path = %report_path.display(), "wrote table report");
        println!("JSON report: {}", report_path.display());
    }

    Ok(0)
}

pub(super) fn run_count_command(args: CountArgs) -> Result<i32, CliError> {
    let mut formulas = args.formulas;
    if let Some(path) = &args.file {
        formulas.extend(read_formula_file(path)?);
    }
    if formulas.is_empty() {
        return Err(CliError::Usage(
            "count needs at least one FORMULA argument or a --file".to_string(),
        ));
    }

    let options = CountOptions {
        mode: args.mode,
        exclude: args.exclude,
        fill_value: (!args.no_fill).then_some(args.fill_value),
    };
    let counts = count_elements(
        &CountInput::Formulas(formulas),
        &options,
        ElementRegistry::standard(),
    )
    .map_err(CliError::Compute)?;

    let rendered = serde_json::to_string_pretty(&counts).context("failed to render counts")?;
    println!("{rendered}");
    Ok(0)
}

pub(super) fn run_elements_command() -> Result<i32, CliError> {
    for element in ElementRegistry::standard().iter() {
        println!(
            "{:>3} {:<3} {:<14} period {}",
            element.atomic_number,
            element.symbol,
            element.name,
            element.period()
        );
    }
    Ok(0)
}
