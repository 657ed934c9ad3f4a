use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{LedgerService, NewTransaction, TransactionView};
use crate::domain::{Direction, ProfileId, Status, format_cents, parse_cents};

/// Lendbook - Personal Lending Ledger
#[derive(Parser)]
#[command(name = "lendbook")]
#[command(about = "A local-first ledger for money lent and borrowed, with simple-interest accrual")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "lendbook.db")]
    pub database: String,

    /// Profile owning the records (created on first use)
    #[arg(short, long, global = true, default_value = "default")]
    pub profile: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record money given out or taken
    Add {
        /// Direction: given (you lent) or taken (you borrowed)
        direction: String,

        /// Principal amount (e.g., "1000.00" or "1000")
        amount: String,

        /// Name of the counterparty
        person: String,

        /// Monthly simple-interest rate in percent (0-100)
        #[arg(short, long, default_value = "0")]
        rate: f64,

        /// Disbursement date (ISO 8601 format: YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Optional repayment deadline (YYYY-MM-DD)
        #[arg(long)]
        due_date: Option<String>,
    },

    /// List transactions with accrued interest
    List {
        /// Filter by status: active, settled
        #[arg(long)]
        status: Option<String>,

        /// Show only overdue transactions
        #[arg(long)]
        overdue: bool,
    },

    /// Show detailed transaction information
    Show {
        /// Transaction ID
        id: String,
    },

    /// Toggle a transaction between Active and Settled
    Settle {
        /// Transaction ID
        id: String,
    },

    /// Delete a transaction permanently
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Show outstanding totals and net position
    Summary,

    /// List known profiles
    Profiles,

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions (CSV), snapshot (JSON)
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Commands::Init = self.command {
            LedgerService::init(&self.database).await?;
            println!("Database initialized: {}", self.database);
            return Ok(());
        }

        let service = LedgerService::connect(&self.database).await?;
        let owner = service.open_profile(&self.profile).await?;

        if self.verbose {
            eprintln!("[lendbook] profile '{}' -> {}", self.profile, owner);
        }

        match self.command {
            Commands::Init => unreachable!("handled above"),

            Commands::Add {
                direction,
                amount,
                person,
                rate,
                date,
                due_date,
            } => {
                let direction = Direction::from_str(&direction).with_context(|| {
                    format!("Invalid direction '{}'. Use 'given' or 'taken'", direction)
                })?;
                let principal_cents = parse_cents(&amount)
                    .context("Invalid amount format. Use '1000.00' or '1000'")?;
                let start_date = date.as_deref().map(parse_date).transpose()?;
                let due_date = due_date.as_deref().map(parse_date).transpose()?;

                let transaction = service
                    .create(
                        owner,
                        NewTransaction {
                            counterparty_name: person,
                            direction,
                            principal_cents,
                            monthly_rate_pct: rate,
                            start_date,
                            due_date,
                        },
                    )
                    .await?;

                println!(
                    "Recorded {}: {} {} {} at {}%/month ({})",
                    transaction.direction,
                    format_cents(transaction.principal_cents),
                    if transaction.direction == Direction::Given {
                        "to"
                    } else {
                        "from"
                    },
                    transaction.counterparty_name,
                    transaction.monthly_rate_pct,
                    transaction.id
                );
            }

            Commands::List { status, overdue } => {
                let status_filter = status
                    .map(|s| {
                        Status::from_str(&s).with_context(|| {
                            format!("Invalid status '{}'. Use 'active' or 'settled'", s)
                        })
                    })
                    .transpose()?;

                run_list_command(&service, owner, status_filter, overdue).await?;
            }

            Commands::Show { id } => {
                let id = parse_transaction_id(&id)?;
                let view = service.get_with_interest(owner, id, Utc::now()).await?;
                print_transaction_detail(&view);
            }

            Commands::Settle { id } => {
                let id = parse_transaction_id(&id)?;
                let transaction = service.toggle_settle(owner, id).await?;
                println!(
                    "Transaction with {} is now {}",
                    transaction.counterparty_name, transaction.status
                );
            }

            Commands::Delete { id } => {
                let id = parse_transaction_id(&id)?;
                let transaction = service.delete(owner, id).await?;
                println!(
                    "Deleted {} {} ({})",
                    transaction.direction,
                    format_cents(transaction.principal_cents),
                    transaction.counterparty_name
                );
            }

            Commands::Summary => {
                run_summary_command(&service, owner).await?;
            }

            Commands::Profiles => {
                let profiles = service.list_profiles().await?;
                if profiles.is_empty() {
                    println!("No profiles found.");
                } else {
                    for (id, name) in profiles {
                        println!("{:<20} {}", name, id);
                    }
                }
            }

            Commands::Export {
                export_type,
                output,
            } => {
                run_export_command(&service, owner, &self.profile, &export_type, output.as_deref())
                    .await?;
            }
        }

        Ok(())
    }
}

async fn run_list_command(
    service: &LedgerService,
    owner: ProfileId,
    status_filter: Option<Status>,
    overdue_only: bool,
) -> Result<()> {
    let views: Vec<TransactionView> = service
        .list_with_interest(owner, Utc::now())
        .await?
        .into_iter()
        .filter(|v| status_filter.is_none_or(|s| v.status == s))
        .filter(|v| !overdue_only || v.overdue)
        .collect();

    if views.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<36} {:<16} {:<6} {:>10} {:>6} {:>5} {:>10} {:>10} {:<8}",
        "ID", "WHO", "DIR", "PRINCIPAL", "RATE", "DAYS", "INTEREST", "TOTAL DUE", "STATUS"
    );
    println!("{}", "-".repeat(115));
    for view in &views {
        let status = if view.overdue {
            "OVERDUE".to_string()
        } else {
            view.status.to_string()
        };
        println!(
            "{:<36} {:<16} {:<6} {:>10} {:>5}% {:>5} {:>10} {:>10} {:<8}",
            view.id,
            view.counterparty_name,
            view.direction,
            format_cents(view.principal_cents),
            view.monthly_rate_pct,
            view.elapsed_days,
            format_cents(view.interest_cents),
            format_cents(view.total_due_cents),
            status
        );
    }

    Ok(())
}

fn print_transaction_detail(view: &TransactionView) {
    println!("Transaction: {}", view.id);
    println!("  Counterparty:  {}", view.counterparty_name);
    println!("  Direction:     {}", view.direction);
    println!("  Principal:     {}", format_cents(view.principal_cents));
    println!("  Rate:          {}%/month", view.monthly_rate_pct);
    println!(
        "  Start date:    {}",
        view.start_date.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(due) = view.due_date {
        println!("  Due date:      {}", due.format("%Y-%m-%d"));
    }
    println!(
        "  Status:        {}{}",
        view.status,
        if view.overdue { " (overdue)" } else { "" }
    );
    println!();
    println!(
        "  Elapsed:       {} days ({:.2} months)",
        view.elapsed_days, view.elapsed_months
    );
    println!("  Interest:      {}", format_cents(view.interest_cents));
    println!("  Total due:     {}", format_cents(view.total_due_cents));
}

async fn run_summary_command(service: &LedgerService, owner: ProfileId) -> Result<()> {
    let summary = service.summary(owner, Utc::now()).await?;

    println!(
        "Given (outstanding):  {}",
        format_cents(summary.total_given_outstanding)
    );
    println!(
        "Taken (outstanding):  {}",
        format_cents(summary.total_taken_outstanding)
    );
    println!(
        "Net balance:          {}",
        format_cents(summary.net_balance)
    );
    println!();
    println!(
        "{} active, {} settled, {} overdue",
        summary.active_count, summary.settled_count, summary.overdue_count
    );

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    owner: ProfileId,
    profile_name: &str,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter
                .export_transactions_csv(owner, Utc::now(), writer)
                .await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "snapshot" => {
            let count = exporter
                .export_snapshot_json(owner, profile_name, Utc::now(), writer)
                .await?;
            if output.is_some() {
                eprintln!("Exported snapshot with {} transactions", count);
            }
        }
        other => {
            anyhow::bail!(
                "Unknown export type '{}'. Valid types: transactions, snapshot",
                other
            );
        }
    }

    Ok(())
}

fn parse_transaction_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).context("Invalid transaction ID format (expected UUID)")
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
