use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};
use log::{error, info, LevelFilter};
use mortgage::event::{EventKind, LoanEvent};
use mortgage::impact::event_impacts;
use mortgage::loan::{LoanParameters, RepaymentStyle};
use mortgage::scenario::Scenario;
use mortgage::schedule::{Amortization, PaymentRecord};
use mortgage::summary::ScheduleSummary;
use serde::Serialize;
use simple_logger::SimpleLogger;
use std::error::Error;
use std::path::PathBuf;
use std::process;

/// Amortization schedules with lump sums, rate changes and term changes
#[derive(Parser, Debug)]
#[command(name = "amortize", version, about)]
struct Cli {
    /// JSON scenario file; replaces the loan flags below
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Loan principal
    #[arg(long, default_value_t = 1_000_000.)]
    principal: f64,

    /// Annual interest rate as a percentage (4.5 = 4.5%)
    #[arg(long, default_value_t = 4.5)]
    rate: f64,

    /// Term in months
    #[arg(long, default_value_t = 360)]
    term: u32,

    /// Repayment style
    #[arg(long, value_enum, default_value_t = Style::EqualPayment)]
    style: Style,

    /// Extra principal paid in a month (repeatable)
    #[arg(long = "lump-sum", value_name = "MONTH:AMOUNT", value_parser = parse_event_arg)]
    lump_sums: Vec<(u32, f64)>,

    /// New annual rate from a month on (repeatable)
    #[arg(long = "rate-change", value_name = "MONTH:RATE", value_parser = parse_event_arg)]
    rate_changes: Vec<(u32, f64)>,

    /// Periods left, counting the given month (repeatable)
    #[arg(long = "term-change", value_name = "MONTH:PERIODS", value_parser = parse_event_arg)]
    term_changes: Vec<(u32, f64)>,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    first_payment: Option<NaiveDate>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Decimal places for JSON output
    #[arg(long, default_value_t = 2)]
    dec_places: u32,

    /// Show how each event changes the interest still owed
    #[arg(long)]
    impact: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Style {
    EqualPayment,
    EqualPrincipal,
}

impl From<Style> for RepaymentStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::EqualPayment => RepaymentStyle::EqualPayment,
            Style::EqualPrincipal => RepaymentStyle::EqualPrincipal,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Summary,
}

#[derive(Serialize)]
struct Report<'a> {
    loan: &'a LoanParameters,
    events: &'a [LoanEvent],
    summary: ScheduleSummary,
    payments: Vec<ReportRow>,
}

#[derive(Serialize)]
struct ReportRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(flatten)]
    payment: PaymentRecord,
}

fn parse_event_arg(arg: &str) -> Result<(u32, f64), String> {
    let (month, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected MONTH:VALUE, got '{}'", arg))?;
    let month = month
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid month '{}': {}", month, e))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value '{}': {}", value, e))?;
    Ok((month, value))
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn build_scenario(cli: &Cli) -> Result<Scenario, Box<dyn Error>> {
    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::from_file(path)?,
        None => Scenario::new(LoanParameters::new(
            cli.principal,
            cli.rate,
            cli.term,
            cli.style.into(),
        )),
    };

    let flagged = [
        (EventKind::LumpSum, &cli.lump_sums),
        (EventKind::RateChange, &cli.rate_changes),
        (EventKind::TermChange, &cli.term_changes),
    ];
    for (kind, values) in flagged {
        scenario.events.extend(
            values
                .iter()
                .map(|&(month, value)| LoanEvent::new(kind, month, value)),
        );
    }

    if cli.first_payment.is_some() {
        scenario.first_pmt_date = cli.first_payment;
    }
    Ok(scenario)
}

fn build_report<'a>(
    scenario: &'a Scenario,
    amortization: &Amortization,
    dec_places: f64,
) -> Report<'a> {
    Report {
        loan: &scenario.loan,
        events: &scenario.events,
        summary: amortization.summary().rounded(dec_places),
        payments: amortization
            .payments()
            .iter()
            .map(|pmt| ReportRow {
                date: amortization.get_pmt_date(pmt.pmt_number),
                payment: pmt.rounded(dec_places),
            })
            .collect(),
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let scenario = build_scenario(cli)?;
    scenario.validate()?;
    info!("{} with {} events", scenario.loan, scenario.events.len());

    let amortization = scenario.amortize();
    let summary = amortization.summary();

    match cli.output {
        OutputFormat::Table => {
            amortization.show_amortization();
            println!();
            println!("{}", summary);
        }
        OutputFormat::Summary => println!("{}", summary),
        OutputFormat::Json => {
            let report = build_report(&scenario, &amortization, f64::from(cli.dec_places));
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if cli.impact {
        println!();
        for impact in event_impacts(&scenario.loan, &scenario.events) {
            println!("{}", impact);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(log_level(cli.verbose)).init() {
        eprintln!("failed to start logging: {}", e);
    }

    if let Err(e) = run(&cli) {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{build_report, build_scenario, parse_event_arg, Cli};
    use clap::Parser;
    use mortgage::event::LoanEvent;
    use mortgage::loan::RepaymentStyle;
    use test_log::test;

    #[test]
    fn test_parse_event_arg() {
        assert_eq!(parse_event_arg("12:10000"), Ok((12, 10000.)));
        assert_eq!(parse_event_arg(" 24 : 3.75 "), Ok((24, 3.75)));
        assert!(parse_event_arg("12").is_err());
        assert!(parse_event_arg("x:1").is_err());
        assert!(parse_event_arg("1:y").is_err());
    }

    #[test]
    fn test_build_scenario_from_flags() {
        let cli = Cli::parse_from([
            "amortize",
            "--principal",
            "250000",
            "--rate",
            "6",
            "--term",
            "120",
            "--style",
            "equal-principal",
            "--lump-sum",
            "12:5000",
            "--lump-sum",
            "24:5000",
            "--rate-change",
            "36:4.5",
            "--term-change",
            "48:60",
            "--first-payment",
            "2024-04-01",
        ]);
        let scenario = build_scenario(&cli).unwrap();

        assert_eq!(scenario.loan.principal, 250000.);
        assert_eq!(scenario.loan.term_months, 120);
        assert_eq!(scenario.loan.style, RepaymentStyle::EqualPrincipal);
        assert_eq!(
            scenario.events,
            vec![
                LoanEvent::lump_sum(12, 5000.),
                LoanEvent::lump_sum(24, 5000.),
                LoanEvent::rate_change(36, 4.5),
                LoanEvent::term_change(48, 60),
            ]
        );
        assert!(scenario.first_pmt_date.is_some());
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["amortize"]);
        let scenario = build_scenario(&cli).unwrap();

        assert_eq!(scenario.loan, mortgage::loan::LoanParameters::default());
        assert!(scenario.events.is_empty());
    }

    #[test]
    fn test_json_report() {
        let cli = Cli::parse_from([
            "amortize",
            "--principal",
            "100000",
            "--rate",
            "0",
            "--term",
            "10",
            "--lump-sum",
            "1:50000",
            "--first-payment",
            "2024-04-01",
        ]);
        let scenario = build_scenario(&cli).unwrap();
        let amortization = scenario.amortize();
        let report = serde_json::to_value(build_report(&scenario, &amortization, 2.)).unwrap();

        let keys: Vec<&str> = report
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 4);
        for key in ["loan", "events", "summary", "payments"] {
            assert!(keys.contains(&key));
        }

        assert_eq!(report["loan"]["term_months"], 10);
        assert_eq!(report["events"][0]["type"], "lump_sum");
        assert_eq!(report["summary"]["total_payments"], 100000.0);
        assert_eq!(report["payments"][0]["date"], "2024-04-01");
        assert_eq!(report["payments"][0]["lump_sum"], 50000.0);
        assert_eq!(report["payments"][1]["pmt_amount"], 4444.44);
        assert!(report["payments"][1].get("lump_sum").is_none());
    }
}
