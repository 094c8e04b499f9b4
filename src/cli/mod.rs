use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::application::{
    BucketReport, CategoryReport, Ledger, LedgerError, parse_date,
};
use crate::config::{self, Config, DEFAULT_CONFIG_FILE};
use crate::domain::{
    Bucket, CategoryFilter, ExpenseRecord, MonthlyBudget, format_cents, parse_cents, parse_month,
    sum_cents,
};
use crate::telemetry;

/// Spendlog - Personal Expense Log
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "A local-first expense log with daily, weekly and monthly totals")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory holding the expenses and budget files (overrides the config)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an expense
    Add {
        /// Amount spent (e.g., "12.50" or "12")
        amount: String,

        /// Category (see `spendlog categories`)
        #[arg(short, long)]
        category: String,

        /// Expense type within the category (e.g., "Lunch")
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Remove an expense by the position shown in `list`
    Remove {
        /// Position in the full ledger
        index: usize,
    },

    /// List expenses
    List {
        /// Only expenses on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Only expenses in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Totals grouped by day, week, month or category
    Summary {
        /// Grouping: day, week, month, category
        #[arg(long, default_value = "month")]
        by: String,

        /// Restrict to one category ("All" for every category)
        #[arg(long)]
        category: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export expenses or grouped totals
    Export {
        /// What to export: records, day, week, month, category
        #[arg(long, default_value = "records")]
        by: String,

        /// Restrict to one category ("All" for every category)
        #[arg(long)]
        category: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Show the accepted categories and expense types
    Categories,

    /// Configuration file commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly budget
    Set {
        /// Budget amount (e.g., "40000" or "40000.00")
        amount: String,

        /// Month as a name or number (defaults to the current month)
        #[arg(long)]
        month: Option<String>,

        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show the budget and spending against it
    Show,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default config file
    Init,

    /// Print the effective configuration
    Show,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut cfg = config::load_config(&self.config)?;
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        Ok(cfg)
    }

    pub fn run(self) -> Result<()> {
        telemetry::init_tracing(self.verbose);
        let cfg = self.load_config()?;

        match self.command {
            Commands::Add {
                amount,
                category,
                expense_type,
                date,
                description,
            } => {
                let mut ledger = open_ledger(&cfg)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '12.50' or '12'")?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => today(),
                };

                let index = ledger.add(
                    date,
                    &category,
                    amount_cents,
                    &description,
                    expense_type.as_deref(),
                )?;
                let record = &ledger.records()[index];
                println!(
                    "Added expense #{}: {} {} {}",
                    index,
                    record.date,
                    record.category,
                    format_cents(record.amount_cents)
                );
            }

            Commands::Remove { index } => {
                let mut ledger = open_ledger(&cfg)?;
                let removed = ledger.remove(index)?;
                println!(
                    "Removed expense #{}: {} {} {}",
                    index,
                    removed.date,
                    removed.category,
                    format_cents(removed.amount_cents)
                );
            }

            Commands::List { date, category } => {
                let ledger = open_ledger(&cfg)?;
                run_list_command(&ledger, date, category.into())?;
            }

            Commands::Summary {
                by,
                category,
                format,
            } => {
                let ledger = open_ledger(&cfg)?;
                run_summary_command(&ledger, &by, category.into(), &format)?;
            }

            Commands::Export {
                by,
                category,
                output,
                format,
            } => {
                let ledger = open_ledger(&cfg)?;
                run_export_command(&ledger, &by, category.into(), output.as_deref(), &format)?;
            }

            Commands::Budget(cmd) => {
                run_budget_command(&cfg, cmd)?;
            }

            Commands::Categories => {
                run_categories_command(&cfg);
            }

            Commands::Config(cmd) => {
                run_config_command(&self.config, &cfg, cmd)?;
            }
        }

        Ok(())
    }
}

fn open_ledger(cfg: &Config) -> Result<Ledger> {
    let store = cfg.expense_store();
    let path = store.path().display().to_string();
    Ledger::load(store, cfg.categories.clone())
        .with_context(|| format!("Failed to load expenses from {}", path))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn select_records<'a>(
    ledger: &'a Ledger,
    date: Option<NaiveDate>,
    filter: &CategoryFilter,
) -> Vec<&'a ExpenseRecord> {
    let mut records: Vec<&ExpenseRecord> = match date {
        Some(d) => ledger.filter_by_date(d),
        None => ledger.records().iter().collect(),
    };
    records.retain(|r| filter.matches(&r.category));
    records
}

fn run_list_command(ledger: &Ledger, date: Option<String>, filter: CategoryFilter) -> Result<()> {
    let date = date.map(|s| parse_date(&s)).transpose()?;
    let records = select_records(ledger, date, &filter);

    if records.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    println!(
        "{:>5} {:<12} {:<15} {:<15} {:>10} DESCRIPTION",
        "#", "DATE", "CATEGORY", "TYPE", "AMOUNT"
    );
    println!("{}", "-".repeat(75));

    for record in &records {
        // Positions refer to the full ledger so `remove` can use them directly
        let index = ledger
            .position(record.id)
            .map(|i| i.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:>5} {:<12} {:<15} {:<15} {:>10} {}",
            index,
            record.date,
            truncate(&record.category, 15),
            truncate(record.expense_type.as_deref().unwrap_or(""), 15),
            format_cents(record.amount_cents),
            truncate(&record.description, 30)
        );
    }

    let total = sum_cents(records.iter().map(|r| r.amount_cents));
    println!("{}", "-".repeat(75));
    println!("{:>5} {:<44} {:>10}", "", "Total", format_cents(total));
    Ok(())
}

fn run_summary_command(
    ledger: &Ledger,
    by: &str,
    filter: CategoryFilter,
    format: &str,
) -> Result<()> {
    use crate::io::{Exporter, export_json};
    use std::io::stdout;

    check_format(format, &["table", "json", "csv"])?;
    check_category_grouping(by, &filter)?;

    if by.eq_ignore_ascii_case("category") {
        let report = CategoryReport::build(ledger);
        match format {
            "json" => export_json(&report, stdout())?,
            "csv" => {
                Exporter::new(ledger).export_categories_csv(stdout())?;
            }
            _ => {
                if report.categories.is_empty() {
                    println!("No expenses found.");
                    return Ok(());
                }
                println!("{:<20} {:>12} {:>6} {:>8}", "CATEGORY", "AMOUNT", "COUNT", "SHARE");
                println!("{}", "-".repeat(49));
                for summary in &report.categories {
                    println!(
                        "{:<20} {:>12} {:>6} {:>7.1}%",
                        truncate(&summary.category, 20),
                        format_cents(summary.total),
                        summary.count,
                        summary.percentage
                    );
                }
                println!("{}", "-".repeat(49));
                println!("{:<20} {:>12}", "Total", format_cents(report.total));
            }
        }
        return Ok(());
    }

    let bucket = parse_bucket(by)?;
    let report = BucketReport::build(ledger, bucket, &filter);
    match format {
        "json" => export_json(&report, stdout())?,
        "csv" => {
            Exporter::new(ledger).export_buckets_csv(bucket, &filter, stdout())?;
        }
        _ => {
            if report.periods.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }
            let label = bucket.column_label().to_uppercase();
            println!("{:<12} {:>12}", label, "AMOUNT");
            println!("{}", "-".repeat(25));
            for period in &report.periods {
                println!("{:<12} {:>12}", period.period, format_cents(period.total));
            }
            println!("{}", "-".repeat(25));
            println!("{:<12} {:>12}", "Total", format_cents(report.total));
        }
    }
    Ok(())
}

fn run_export_command(
    ledger: &Ledger,
    by: &str,
    filter: CategoryFilter,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    use crate::io::{Exporter, export_json};
    use std::fs::File;
    use std::io::{Write, stdout};

    check_format(format, &["csv", "json"])?;
    check_category_grouping(by, &filter)?;
    let by = by.to_lowercase();
    let bucket = match by.as_str() {
        "records" | "category" => None,
        other => Some(parse_bucket(other)?),
    };

    let exporter = Exporter::new(ledger);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match (bucket, by.as_str(), format) {
        (Some(bucket), _, "json") => {
            let report = BucketReport::build(ledger, bucket, &filter);
            export_json(&report, writer)?;
            report.periods.len()
        }
        (Some(bucket), _, _) => exporter.export_buckets_csv(bucket, &filter, writer)?,
        (None, "category", "json") => {
            let report = CategoryReport::build(ledger);
            export_json(&report, writer)?;
            report.categories.len()
        }
        (None, "category", _) => exporter.export_categories_csv(writer)?,
        (None, _, "json") => {
            let records = select_records(ledger, None, &filter);
            export_json(&records, writer)?;
            records.len()
        }
        (None, _, _) => exporter.export_filtered_csv(&filter, writer)?,
    };

    if let Some(path) = output {
        eprintln!("Exported {} rows to {}", count, path);
    }
    Ok(())
}

fn run_budget_command(cfg: &Config, cmd: BudgetCommands) -> Result<()> {
    let store = cfg.budget_store();

    match cmd {
        BudgetCommands::Set {
            amount,
            month,
            year,
        } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '400.00' or '400'")?;
            if amount_cents <= 0 {
                return Err(LedgerError::InvalidAmount(amount_cents).into());
            }

            let now = today();
            let month = match month {
                Some(m) => parse_month(&m).ok_or_else(|| LedgerError::InvalidMonth(m.clone()))?,
                None => MonthlyBudget::for_date(now, amount_cents).month,
            };
            let budget = MonthlyBudget::new(month, year.unwrap_or(now.year()), amount_cents);

            store
                .save(&budget)
                .with_context(|| format!("Failed to save budget to {}", store.path().display()))?;
            println!(
                "Budget for {} {}: {}",
                budget.month.name(),
                budget.year,
                format_cents(budget.amount_cents)
            );
        }

        BudgetCommands::Show => {
            let budget = store
                .load()
                .with_context(|| format!("Failed to read budget from {}", store.path().display()))?;
            let Some(budget) = budget else {
                println!("No budget set.");
                return Ok(());
            };

            let ledger = open_ledger(cfg)?;
            let status = ledger.budget_status(&budget);

            println!("Budget for {} {}", budget.month.name(), budget.year);
            println!("  Budget:    {:>12}", format_cents(budget.amount_cents));
            println!("  Spent:     {:>12}", format_cents(status.spent));
            println!("  Remaining: {:>12}", format_cents(status.remaining));
            println!("  Used:      {:>11.1}%", status.used_percentage());
            if status.over_budget() {
                println!();
                println!("Over budget by {}", format_cents(-status.remaining));
            }
        }
    }
    Ok(())
}

fn run_categories_command(cfg: &Config) {
    if cfg.categories.is_open() {
        println!("Any category is accepted (no categories configured).");
        return;
    }

    println!("{:<20} TYPES", "CATEGORY");
    println!("{}", "-".repeat(60));
    for spec in cfg.categories.categories() {
        println!("{:<20} {}", spec.name, spec.types.join(", "));
    }
}

fn run_config_command(path: &Path, cfg: &Config, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init => {
            if config::init_config(path)? {
                println!("Wrote {}", path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
        }
    }
    Ok(())
}

fn check_format(format: &str, valid: &[&str]) -> Result<()> {
    if !valid.contains(&format) {
        anyhow::bail!(
            "Invalid format '{}'. Valid formats: {}",
            format,
            valid.join(", ")
        );
    }
    Ok(())
}

/// Category totals already cover every category, so a category filter has nothing to restrict.
fn check_category_grouping(by: &str, filter: &CategoryFilter) -> Result<()> {
    if let CategoryFilter::Only(name) = filter {
        if by.eq_ignore_ascii_case("category") {
            anyhow::bail!(
                "--category {} cannot be combined with --by category; use `list --category {}`",
                name,
                name
            );
        }
    }
    Ok(())
}

fn parse_bucket(by: &str) -> Result<Bucket> {
    Bucket::from_str(by).with_context(|| {
        format!(
            "Invalid grouping '{}'. Valid groupings: day, week, month, category",
            by
        )
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
