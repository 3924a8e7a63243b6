use std::process::ExitCode;

use clap::Parser;
use jiff::civil::Date;
use jiff::Zoned;
use recur::{Frequency, Rule, RuleFields, PREVIEW_LEN};

mod logger;

/// Upper bound on how many dates one invocation prints.
const MAX_COUNT: usize = 1000;

#[derive(Parser)]
#[command(name = "recur", about = "Recurrence rules for recurring tasks", version)]
struct Cli {
    /// Rule text (e.g., "FREQ=WEEKLY;BYDAY=MO,FR")
    rule: Option<String>,

    /// Build the rule from fields instead: daily, weekly, monthly or yearly
    #[arg(long, value_parser = parse_frequency, conflicts_with = "rule")]
    freq: Option<Frequency>,

    /// Repeat every N units (with --freq)
    #[arg(long, requires = "freq", allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Weekday number, 0 = Sunday .. 6 = Saturday (with --freq weekly; repeatable)
    #[arg(
        long = "weekday",
        value_delimiter = ',',
        requires = "freq",
        allow_negative_numbers = true
    )]
    weekdays: Vec<i64>,

    /// Day of the month, 1-31 (with --freq monthly)
    #[arg(long, requires = "freq", allow_negative_numbers = true)]
    month_day: Option<i64>,

    /// Number of occurrences to show [default: 5, or 1000 with --until]
    #[arg(short = 'n', long = "count", env = "RECUR_COUNT")]
    count: Option<usize>,

    /// First date of the projection (YYYY-MM-DD) [default: today]
    #[arg(long, env = "RECUR_START")]
    start: Option<Date>,

    /// Only show occurrences on or before this date
    #[arg(long)]
    until: Option<Date>,

    /// Only show occurrences strictly after this date
    #[arg(long)]
    after: Option<Date>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Validate the rule without projecting it
    #[arg(long)]
    check: bool,

    /// Show the parsed rule as JSON
    #[arg(long)]
    parse: bool,

    /// Print the canonical rule text
    #[arg(long)]
    encode: bool,

    /// Print an English summary of the rule
    #[arg(long)]
    describe: bool,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, env = "RECUR_LOG")]
    log_level: Option<log::LevelFilter>,

    /// Log to stderr (-v debug, -vv trace); overrides --log-level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

enum Failure {
    /// The rule was rejected.
    Rule(recur::Error),
    /// The invocation itself was wrong.
    Usage(String),
    Other(String),
}

impl Failure {
    fn report(&self) -> ExitCode {
        match self {
            Self::Rule(e) => {
                eprintln!("{}", e.display_rich());
                ExitCode::from(1)
            }
            Self::Usage(msg) => {
                eprintln!("error: {msg}");
                ExitCode::from(2)
            }
            Self::Other(msg) => {
                eprintln!("error: {msg}");
                ExitCode::from(1)
            }
        }
    }
}

impl From<recur::InvalidRuleError> for Failure {
    fn from(e: recur::InvalidRuleError) -> Self {
        Self::Rule(e.into())
    }
}

impl From<recur::MalformedRuleError> for Failure {
    fn from(e: recur::MalformedRuleError) -> Self {
        Self::Rule(e.into())
    }
}

fn parse_frequency(s: &str) -> Result<Frequency, String> {
    Frequency::from_token(s)
        .ok_or_else(|| format!("unknown frequency '{s}'; expected daily, weekly, monthly or yearly"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => cli.log_level.unwrap_or(log::LevelFilter::Off),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if let Err(e) = logger::Logger::init(level) {
        eprintln!("error: failed to install logger: {e}");
        return ExitCode::from(2);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => failure.report(),
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let rule = rule(cli)?;
    log::debug!("rule: {rule}");

    if cli.check {
        println!("\u{2713} valid");
        return Ok(());
    }
    if cli.parse {
        let json = serde_json::to_string_pretty(&rule)
            .map_err(|e| Failure::Other(format!("failed to serialize: {e}")))?;
        println!("{json}");
        return Ok(());
    }
    if cli.encode || cli.describe {
        if cli.encode {
            println!("{rule}");
        }
        if cli.describe {
            println!("{}", rule.describe());
        }
        return Ok(());
    }

    let dates = project(cli, &rule);
    if dates.is_empty() {
        eprintln!("no occurrences in range");
        return Ok(());
    }
    if cli.json {
        let iso: Vec<String> = dates.iter().map(Date::to_string).collect();
        let json = serde_json::to_string(&iso)
            .map_err(|e| Failure::Other(format!("failed to serialize: {e}")))?;
        println!("{json}");
    } else {
        for d in &dates {
            println!("{d}");
        }
    }
    Ok(())
}

/// The rule from text or from `--freq` and friends.
fn rule(cli: &Cli) -> Result<Rule, Failure> {
    if let Some(freq) = cli.freq {
        let mut fields = RuleFields::new(freq)
            .interval(cli.interval.unwrap_or(1))
            .weekdays(cli.weekdays.iter().copied());
        fields.month_day = cli.month_day;
        return Ok(fields.build()?);
    }
    match cli.rule.as_deref() {
        Some(text) => Ok(Rule::parse(text)?),
        None => Err(Failure::Usage("no rule provided; pass rule text or --freq".into())),
    }
}

fn project(cli: &Cli, rule: &Rule) -> Vec<Date> {
    let default = if cli.until.is_some() { MAX_COUNT } else { PREVIEW_LEN };
    let mut n = cli.count.unwrap_or(default);
    if n > MAX_COUNT {
        eprintln!("warning: capped at {MAX_COUNT} occurrences");
        n = MAX_COUNT;
    }

    let start = cli.start.unwrap_or_else(|| Zoned::now().date());
    let mut occurrences = rule.occurrences(start);
    if let Some(after) = cli.after {
        occurrences = occurrences.after(after);
    }
    match cli.until {
        Some(end) => occurrences.until(end).take(n).collect(),
        None => occurrences.take(n).collect(),
    }
}
