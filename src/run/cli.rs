use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::parse_flag;
use crate::engine::{Engine, LedgerSink, Settlement, Submission};
use crate::format::{format_amount, format_timestamp, truncate};
use crate::models::{Category, TransactionStatus};

const DEFAULT_HISTORY_LIMIT: usize = 20;

pub(crate) fn as_cli<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];
    match command.as_str() {
        "pay" => cli_pay(rest, engine),
        "buy" => cli_buy(rest, engine),
        "sell" => cli_sell(rest, engine),
        "fee" => cli_fee(rest, engine),
        "history" | "h" => cli_history(rest, engine),
        "alerts" => cli_alerts(rest, engine),
        "budgets" => cli_budgets(engine),
        "budget" => cli_set_budget(rest, engine),
        "balance" | "b" => cli_balance(engine),
        "roundup" => cli_roundup(rest, engine),
        "export" => cli_export(rest, engine),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("rbupay {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("RBUPay: student wallet ledger");
    println!();
    println!("Usage: rbupay <command>");
    println!();
    println!("Commands:");
    println!("  pay <amount> <recipient>      Record a payment (always a debit; use sell for proceeds)");
    println!("    --category <name>           Food, Travel, Utilities, Shopping, ... (default: Others)");
    println!("    --status <status>           completed, pending or failed (default: completed)");
    println!("  buy <symbol> <qty> <price>    Buy shares");
    println!("  sell <symbol> <qty> <price>   Sell shares");
    println!("  fee <amount> <title>          Put money towards a student fee");
    println!("  history [--limit <n>]         Show recent transactions, newest first");
    println!("  alerts [clear]                Show or clear risk alerts");
    println!("  budgets                       Show budget envelopes");
    println!("  budget <category> <limit>     Set a budget limit");
    println!("  balance                       Show wallet balance and holdings");
    println!("  roundup [on|off]              Show or toggle round-up sweeps");
    println!("  export [path]                 Export history to CSV");
    println!("  --dry-run                     With any command: apply in memory only, save nothing");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument parsing ─────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Positional arguments with `--flag value` pairs removed.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().trim_start_matches('₹').replace(',', "");
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {s}"))
}

pub(crate) fn parse_category(s: &str) -> Result<Category> {
    let category = Category::parse(s);
    if category == Category::Others && !s.trim().eq_ignore_ascii_case("others") {
        let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
        anyhow::bail!("Unknown category '{s}'. Expected one of: {}", names.join(", "));
    }
    Ok(category)
}

fn parse_status(s: &str) -> Result<TransactionStatus> {
    TransactionStatus::parse(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown status '{s}'. Expected completed, pending or failed"))
}

// ── Submissions ──────────────────────────────────────────────

fn cli_pay<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: rbupay pay <amount> <recipient> [--category <name>] [--status <status>]");
    }
    let amount = parse_amount(pos[0])?;
    let recipient = pos[1..].join(" ");
    let category = flag(args, "--category")
        .map(parse_category)
        .transpose()?
        .unwrap_or(Category::Others);
    let status = flag(args, "--status")
        .map(parse_status)
        .transpose()?
        .unwrap_or(TransactionStatus::Completed);

    let submission = engine.pay(amount, &recipient, category, status)?;
    print_submission(&submission, engine);
    Ok(())
}

fn order_args(args: &[String], verb: &str) -> Result<(String, Decimal, Decimal)> {
    if args.len() < 3 {
        anyhow::bail!("Usage: rbupay {verb} <symbol> <qty> <price>");
    }
    Ok((
        args[0].clone(),
        parse_amount(&args[1])?,
        parse_amount(&args[2])?,
    ))
}

fn cli_buy<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    let (symbol, quantity, price) = order_args(args, "buy")?;
    let submission = engine.buy_stock(&symbol, quantity, price)?;
    print_submission(&submission, engine);
    Ok(())
}

fn cli_sell<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    let (symbol, quantity, price) = order_args(args, "sell")?;
    let submission = engine.sell_stock(&symbol, quantity, price)?;
    print_submission(&submission, engine);
    Ok(())
}

fn cli_fee<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: rbupay fee <amount> <title>");
    }
    let amount = parse_amount(&args[0])?;
    let title = args[1..].join(" ");
    let submission = engine.contribute_fee(amount, &title)?;
    print_submission(&submission, engine);
    Ok(())
}

fn print_submission<S: LedgerSink>(submission: &Submission, engine: &Engine<S>) {
    let tx = &submission.transaction;
    match submission.settlement {
        Settlement::Credited(amount) => {
            println!("Credited {} from {}", format_amount(amount), tx.recipient)
        }
        Settlement::Debited { amount, budget } => {
            println!("Paid {} to {}", format_amount(amount), tx.recipient);
            if let Some(category) = budget {
                if let Some(b) = engine.budget(category) {
                    println!(
                        "  {category} budget: {} of {} spent",
                        format_amount(b.spent),
                        format_amount(b.limit_amount)
                    );
                }
            }
        }
        Settlement::Recorded => println!("Recorded {} transaction {}", tx.status, tx.id),
    }
    if let Some(sweep) = tx.round_up_amount {
        println!(
            "  Round-up: {} swept (total out {})",
            format_amount(sweep),
            format_amount(tx.total_outflow())
        );
    }
    if let Some(alert) = &submission.alert {
        println!(
            "  ⚠ {} risk ({}): {}",
            alert.severity, alert.alert_type, alert.description
        );
    }
    let wallet = engine.wallet();
    println!("  Balance: {}", format_amount(wallet.balance));
    if wallet.is_overdrawn() {
        println!("  Wallet is overdrawn");
    }
}

// ── Reports ──────────────────────────────────────────────────

fn cli_history<S: LedgerSink>(args: &[String], engine: &Engine<S>) -> Result<()> {
    let limit = match flag(args, "--limit") {
        Some(n) => n
            .parse::<usize>()
            .with_context(|| format!("Invalid limit: {n}"))?,
        None => DEFAULT_HISTORY_LIMIT,
    };
    let history = engine.history();
    if history.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<16} {:<10} {:<24} {:<12} {:>14} {:>8} Risk",
        "When", "Status", "Recipient", "Category", "Amount", "Round-up"
    );
    println!("{}", "─".repeat(96));
    for tx in history.iter().take(limit) {
        let sign = if tx.kind.is_credit() { "+" } else { "" };
        println!(
            "{:<16} {:<10} {:<24} {:<12} {:>14} {:>8} {}",
            format_timestamp(tx.timestamp),
            tx.status,
            truncate(&tx.recipient, 24),
            tx.category,
            format!("{sign}{}", format_amount(tx.amount)),
            tx.round_up_amount
                .map(format_amount)
                .unwrap_or_default(),
            tx.risk_score,
        );
    }
    if history.len() > limit {
        println!("… {} older transactions", history.len() - limit);
    }
    Ok(())
}

fn cli_alerts<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    if args.first().map(String::as_str) == Some("clear") {
        engine.clear_alerts();
        println!("Alerts cleared");
        return Ok(());
    }
    let alerts = engine.alerts();
    if alerts.is_empty() {
        println!("No alerts");
        return Ok(());
    }
    for alert in &alerts {
        println!(
            "{:<16} {:<8} {:<8} {}  [{}]",
            format_timestamp(alert.timestamp),
            alert.severity,
            alert.alert_type,
            alert.description,
            alert.tx_id,
        );
    }
    Ok(())
}

fn cli_budgets<S: LedgerSink>(engine: &Engine<S>) -> Result<()> {
    let budgets = engine.budgets();
    if budgets.is_empty() {
        println!("No budgets");
        return Ok(());
    }
    println!(
        "{:<12} {:>14} {:>14} {:>14}",
        "Category", "Spent", "Limit", "Remaining"
    );
    println!("{}", "─".repeat(57));
    for b in budgets {
        let marker = if b.is_exceeded() { "  over" } else { "" };
        println!(
            "{:<12} {:>14} {:>14} {:>14}{marker}",
            b.category,
            format_amount(b.spent),
            format_amount(b.limit_amount),
            format_amount(b.remaining()),
        );
    }
    Ok(())
}

fn cli_set_budget<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: rbupay budget <category> <limit>");
    }
    let category = parse_category(&args[0])?;
    let limit = parse_amount(&args[1])?;
    let budget = engine.set_budget_limit(category, limit)?;
    println!(
        "{} budget set to {} ({} spent)",
        budget.category,
        format_amount(budget.limit_amount),
        format_amount(budget.spent)
    );
    Ok(())
}

fn cli_balance<S: LedgerSink>(engine: &Engine<S>) -> Result<()> {
    let wallet = engine.wallet();
    println!("{} ({})", wallet.holder, wallet.currency);
    println!("{}", "─".repeat(40));
    println!("  Balance:      {}", format_amount(wallet.balance));
    println!("  Invested:     {}", format_amount(engine.invested()));
    println!("  Transactions: {}", engine.history().len());

    let holdings = engine.holdings();
    if !holdings.is_empty() {
        println!();
        println!("Holdings:");
        for h in holdings {
            println!(
                "  {:<12} {:>8} @ {:>12}  {}",
                h.symbol,
                h.quantity,
                format_amount(h.avg_price),
                format_amount(h.cost_basis())
            );
        }
    }
    Ok(())
}

fn cli_roundup<S: LedgerSink>(args: &[String], engine: &mut Engine<S>) -> Result<()> {
    if let Some(value) = args.first() {
        let enabled = parse_flag(value)
            .ok_or_else(|| anyhow::anyhow!("Usage: rbupay roundup [on|off]"))?;
        engine.set_round_up(enabled);
    }
    let state = if engine.settings().round_up_enabled {
        "on"
    } else {
        "off"
    };
    println!("Round-up is {state}");
    Ok(())
}

fn cli_export<S: LedgerSink>(args: &[String], engine: &Engine<S>) -> Result<()> {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join("rbupay-history.csv")
        });

    let count = crate::export::write_history_csv(&path, engine.history())?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {}", path.display());
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
