//! Command-line interface: logging entries, totals, history, export.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::parsers::parse_value_input;
use crate::services::{
    export_csv, CalculationOutcome, CompoundCalculator, JsonStore, QuantityAggregator,
    QuantityRepository,
};
use crate::types::{
    CompoundConfig, CompoundOperation, Entry, GroupingPeriod, QuantityType, ValueFormat,
    DEFAULT_COLOR_HEX, DEFAULT_ICON,
};

/// Personal quantity tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the store file (defaults to ~/.tally/tally.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a quantity type
    Add {
        /// Display name, e.g. "Water (oz)"
        name: String,

        /// Value format: integer, decimal, or duration
        #[arg(long, default_value = "integer")]
        format: String,

        /// Aggregation: sum, average, median, min, max, or count
        #[arg(long, default_value = "sum")]
        aggregation: String,

        /// Time window: all-time, daily, weekly, or monthly
        #[arg(long, default_value = "all-time")]
        period: String,

        /// Icon name
        #[arg(long, default_value = DEFAULT_ICON)]
        icon: String,

        /// Accent color as hex
        #[arg(long, default_value = DEFAULT_COLOR_HEX)]
        color: String,

        /// Make this a compound type with the given operation:
        /// divide, multiply, add, subtract, or time-difference
        #[arg(long)]
        compound_op: Option<String>,

        /// Label of the first compound sub-input
        #[arg(long, requires = "compound_op")]
        input1_label: Option<String>,

        /// Format of the first compound sub-input
        #[arg(long, default_value = "decimal")]
        input1_format: String,

        /// Label of the second compound sub-input
        #[arg(long, requires = "compound_op")]
        input2_label: Option<String>,

        /// Format of the second compound sub-input
        #[arg(long, default_value = "decimal")]
        input2_format: String,
    },

    /// Log a value (free-text: "90 minutes", "1.5 hours", "2:30", "8.5")
    Log {
        /// Value text; omit for compound types and pass --input1/--input2
        value: Option<String>,

        /// Quantity type name; defaults to the most recently used
        #[arg(long)]
        to: Option<String>,

        /// Optional notes
        #[arg(long, default_value = "")]
        notes: String,

        /// First compound sub-input (RFC 3339 instant for time-difference)
        #[arg(long)]
        input1: Option<String>,

        /// Second compound sub-input (RFC 3339 instant for time-difference)
        #[arg(long)]
        input2: Option<String>,
    },

    /// Show the current windowed total for one or all quantity types
    Total {
        /// Quantity type name; omit for all
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show grouped historical totals for a quantity type
    History {
        /// Quantity type name
        name: String,

        /// Bucket by: day, week, month, year, or all
        #[arg(long, default_value = "day")]
        by: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List quantity types
    Types,

    /// Delete a quantity type and all of its entries
    Delete {
        /// Quantity type name
        name: String,
    },

    /// Export all entries as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TotalReport {
    name: String,
    total: f64,
    formatted: String,
    aggregation: &'static str,
    period: &'static str,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let store = match &self.store {
            Some(path) => JsonStore::with_path(path.clone()),
            None => JsonStore::open_default()?,
        };
        store.seed_defaults()?;

        match self.command {
            Commands::Add {
                name,
                format,
                aggregation,
                period,
                icon,
                color,
                compound_op,
                input1_label,
                input1_format,
                input2_label,
                input2_format,
            } => {
                if store.quantity_type_by_name(&name).is_some() {
                    bail!("a quantity type named '{}' already exists", name);
                }

                let mut quantity_type = QuantityType::new(name.as_str(), parse_arg(&format)?);
                quantity_type.aggregation_type = parse_arg(&aggregation)?;
                quantity_type.aggregation_period = parse_arg(&period)?;
                quantity_type.icon = icon;
                quantity_type.color_hex = color;
                quantity_type.sort_order = store.quantity_types().len() as i32;

                if let Some(op) = compound_op {
                    let config = CompoundConfig {
                        input1_label: input1_label
                            .context("--input1-label is required for compound types")?,
                        input1_format: parse_arg(&input1_format)?,
                        input2_label: input2_label
                            .context("--input2-label is required for compound types")?,
                        input2_format: parse_arg(&input2_format)?,
                        operation: parse_arg(&op)?,
                    };
                    quantity_type.set_compound_config(&config);
                }

                store.insert_quantity_type(quantity_type)?;
                println!("Created quantity type '{}'", name);
                Ok(())
            }

            Commands::Log {
                value,
                to,
                notes,
                input1,
                input2,
            } => {
                let quantity_type = match &to {
                    Some(name) => store.require_by_name(name)?,
                    None => store
                        .most_recently_used()
                        .context("no quantity types yet; create one with 'tally add'")?,
                };

                let logged = match quantity_type.compound_config() {
                    Some(config) => log_compound(&config, input1.as_deref(), input2.as_deref())?,
                    None => {
                        let text = value.context("a value is required, e.g. 'tally log 8.5'")?;
                        parse_value_input(&text, quantity_type.value_format)
                            .with_context(|| format!("could not understand value '{}'", text))?
                    }
                };

                let entry = Entry::new(logged, quantity_type.id).with_notes(notes);
                store.insert_entry(entry)?;
                println!(
                    "Logged {} to {}",
                    quantity_type.value_format.format(logged),
                    quantity_type.name
                );
                Ok(())
            }

            Commands::Total { name, json } => {
                let now = Local::now();
                let targets = match &name {
                    Some(wanted) => vec![store.require_by_name(wanted)?],
                    None => store
                        .quantity_types()
                        .into_iter()
                        .filter(|qt| !qt.is_hidden)
                        .collect(),
                };

                let reports: Vec<TotalReport> = targets
                    .iter()
                    .map(|qt| {
                        let total = QuantityAggregator::total_from_repository(&store, qt, &now);
                        TotalReport {
                            name: qt.name.clone(),
                            total,
                            formatted: qt.value_format.format(total),
                            aggregation: qt.aggregation_type.short_display_name(),
                            period: qt.aggregation_period.short_display_name(),
                        }
                    })
                    .collect();

                if json {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                } else {
                    for report in reports {
                        println!(
                            "{}: {} ({}, {})",
                            report.name, report.formatted, report.aggregation, report.period
                        );
                    }
                }
                Ok(())
            }

            Commands::History { name, by, json } => {
                let quantity_type = store.require_by_name(&name)?;
                let period: GroupingPeriod = parse_arg(&by)?;
                let entries = store.entries(quantity_type.id, None);
                let grouped = QuantityAggregator::calculate_grouped_totals(
                    &quantity_type,
                    &entries,
                    period,
                    &Local,
                );

                if json {
                    println!("{}", serde_json::to_string_pretty(&grouped)?);
                } else {
                    for bucket in grouped {
                        println!(
                            "{}: {} ({} entries)",
                            bucket.period_label,
                            quantity_type.value_format.format(bucket.total),
                            bucket.count
                        );
                    }
                }
                Ok(())
            }

            Commands::Types => {
                for qt in store.quantity_types() {
                    let hidden = if qt.is_hidden { " (hidden)" } else { "" };
                    let compound = if qt.is_compound { " [compound]" } else { "" };
                    println!(
                        "{}: {}, {}, {}{}{}",
                        qt.name,
                        qt.value_format.display_name(),
                        qt.aggregation_type.display_name(),
                        qt.aggregation_period.display_name(),
                        compound,
                        hidden
                    );
                }
                Ok(())
            }

            Commands::Delete { name } => {
                let quantity_type = store.require_by_name(&name)?;
                store.delete_quantity_type(quantity_type.id)?;
                println!("Deleted '{}' and its entries", quantity_type.name);
                Ok(())
            }

            Commands::Export { output } => {
                let csv_text = export_csv(&store.quantity_types(), &store.all_entries())?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, csv_text)?;
                        println!("Exported to {}", path.display());
                    }
                    None => print!("{}", csv_text),
                }
                Ok(())
            }
        }
    }
}

fn parse_arg<T>(text: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    text.parse::<T>().map_err(anyhow::Error::msg)
}

/// Resolve a compound log: both sub-inputs parsed per their configured
/// formats (or as instants for time-difference), combined by the
/// operation. Divide-by-zero surfaces as an error, never as 0.
fn log_compound(
    config: &CompoundConfig,
    input1: Option<&str>,
    input2: Option<&str>,
) -> anyhow::Result<f64> {
    let raw1 = input1.with_context(|| format!("--input1 ({}) is required", config.input1_label))?;
    let raw2 = input2.with_context(|| format!("--input2 ({}) is required", config.input2_label))?;

    let mut calculator = CompoundCalculator::new(config.clone());
    if config.operation == CompoundOperation::TimeDifference {
        calculator.set_input1(Some(parse_instant(raw1)?));
        calculator.set_input2(Some(parse_instant(raw2)?));
    } else {
        calculator.set_input1(Some(parse_sub_input(raw1, config.input1_format)?));
        calculator.set_input2(Some(parse_sub_input(raw2, config.input2_format)?));
    }

    match calculator.outcome() {
        CalculationOutcome::Value(value) => Ok(value),
        CalculationOutcome::DivideByZero => bail!("divide by zero"),
        CalculationOutcome::Incomplete => bail!("both inputs are required"),
    }
}

fn parse_sub_input(text: &str, format: ValueFormat) -> anyhow::Result<f64> {
    parse_value_input(text, format)
        .with_context(|| format!("could not understand value '{}'", text))
}

/// RFC 3339 instant as Unix seconds, the scalar form the time-difference
/// calculation runs on.
fn parse_instant(text: &str) -> anyhow::Result<f64> {
    let instant: DateTime<Utc> = DateTime::parse_from_rfc3339(text.trim())
        .with_context(|| format!("could not parse instant '{}', expected RFC 3339", text))?
        .with_timezone(&Utc);
    Ok(instant.timestamp() as f64)
}
