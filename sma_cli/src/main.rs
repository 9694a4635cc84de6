use clap::{Parser, Subcommand};
use sma_core::config::ReportFormat;
use sma_core::report::{self, ChecklistReport, PairReport};
use sma_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "smacheck")]
#[command(about = "SMA early-suspicion screening checklist and carrier calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Do not count this run in the usage counter
    #[arg(long, global = true)]
    no_usage: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a screening checklist and print the summary
    Checklist {
        /// Read the checklist from a JSON or TOML file
        #[arg(long)]
        input: Option<PathBuf>,

        /// Mark a finding (repeatable, or comma separated)
        #[arg(long = "set", value_name = "FIELD", value_delimiter = ',')]
        set: Vec<Finding>,

        /// Unmark a finding (repeatable, or comma separated)
        #[arg(long = "clear", value_name = "FIELD", value_delimiter = ',')]
        clear: Vec<Finding>,

        /// Age in months, as written
        #[arg(long)]
        age_months: Option<String>,

        /// Age in years, as written
        #[arg(long)]
        age_years: Option<String>,

        /// Sex (m, f)
        #[arg(long)]
        sex: Option<Sex>,

        /// Gestation (term, preterm)
        #[arg(long)]
        gestation: Option<Gestation>,

        /// Gestational age in weeks for preterm births, as written
        #[arg(long)]
        preterm_weeks: Option<String>,

        /// Pregnancy and birth were uneventful (yes, no)
        #[arg(long, value_parser = parse_yes_no)]
        pregnancy_no_issues: Option<bool>,

        /// Print JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Look up the inheritance outcome for two carrier statuses
    Pair {
        /// Your status (healthy, carrier, affected, unknown)
        #[arg(long)]
        me: Status,

        /// Your partner's status (healthy, carrier, affected, unknown)
        #[arg(long)]
        partner: Status,

        /// Print JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// List every checklist field
    Fields,

    /// Show how many screening sessions have been run
    Usage,

    /// Show the effective configuration, or write a default config file
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,

        /// Overwrite an existing config file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

/// Demographic overrides collected from flags
struct Demographics {
    age_months: Option<String>,
    age_years: Option<String>,
    sex: Option<Sex>,
    gestation: Option<Gestation>,
    preterm_weeks: Option<String>,
    pregnancy_no_issues: Option<bool>,
}

fn main() -> Result<()> {
    sma_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let count_usage = config.usage.enabled && !cli.no_usage;

    match cli.command {
        Commands::Checklist {
            input,
            set,
            clear,
            age_months,
            age_years,
            sex,
            gestation,
            preterm_weeks,
            pregnancy_no_issues,
            json,
        } => {
            let demographics = Demographics {
                age_months,
                age_years,
                sex,
                gestation,
                preterm_weeks,
                pregnancy_no_issues,
            };
            let checklist = build_checklist(input.as_deref(), &set, &clear, demographics)?;
            cmd_checklist(&checklist, json, &config)?;
            record_usage(&data_dir, &config, count_usage);
            Ok(())
        }
        Commands::Pair { me, partner, json } => {
            cmd_pair(me, partner, json, &config)?;
            record_usage(&data_dir, &config, count_usage);
            Ok(())
        }
        Commands::Fields => {
            cmd_fields();
            Ok(())
        }
        Commands::Usage => cmd_usage(&data_dir, &config),
        Commands::Config { init, force } => cmd_config(&config, init, force),
    }
}

fn parse_yes_no(s: &str) -> std::result::Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(format!("expected yes or no, got '{}'", other)),
    }
}

fn load_checklist(path: &Path) -> Result<Checklist> {
    let contents = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let checklist: Checklist = if is_toml {
        toml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    tracing::debug!("Loaded checklist from {:?}", path);
    Ok(checklist)
}

fn build_checklist(
    input: Option<&Path>,
    set: &[Finding],
    clear: &[Finding],
    demographics: Demographics,
) -> Result<Checklist> {
    let mut checklist = match input {
        Some(path) => load_checklist(path)?,
        None => Checklist::default(),
    };

    for finding in set {
        finding.set(&mut checklist, true);
    }
    for finding in clear {
        if set.contains(finding) {
            return Err(Error::InvalidInput(format!(
                "'{}' is both set and cleared",
                finding
            )));
        }
        finding.set(&mut checklist, false);
    }

    if let Some(v) = demographics.age_months {
        checklist.age_months = v;
    }
    if let Some(v) = demographics.age_years {
        checklist.age_years = v;
    }
    if let Some(v) = demographics.sex {
        checklist.sex = Some(v);
    }
    if let Some(v) = demographics.gestation {
        checklist.gestation = Some(v);
    }
    if let Some(v) = demographics.preterm_weeks {
        checklist.preterm_weeks = v;
    }
    if let Some(v) = demographics.pregnancy_no_issues {
        checklist.pregnancy_no_issues = Some(v);
    }

    Ok(checklist)
}

fn wants_json(flag: bool, config: &Config) -> bool {
    flag || config.report.format == ReportFormat::Json
}

fn cmd_checklist(checklist: &Checklist, json: bool, config: &Config) -> Result<()> {
    let catalog = EnglishCatalog;
    let result = evaluate_checklist(checklist);

    if wants_json(json, config) {
        let report = ChecklistReport::new(checklist, &result, &catalog);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            report::render_checklist(checklist, &result, &catalog, config.report.meter_width)
        );
    }
    Ok(())
}

fn cmd_pair(me: Status, partner: Status, json: bool, config: &Config) -> Result<()> {
    let catalog = EnglishCatalog;
    let outcome = evaluate_pair(me, partner);

    if wants_json(json, config) {
        let report = PairReport::new(me, partner, &outcome, &catalog);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            report::render_pair(me, partner, &outcome, &catalog, config.report.meter_width)
        );
    }
    Ok(())
}

fn cmd_fields() {
    for category in FindingCategory::ALL {
        println!("{}", category.label());
        for finding in Finding::in_category(category) {
            println!("  {:<28}{}", finding.key(), finding.description());
        }
    }
}

fn cmd_usage(data_dir: &Path, config: &Config) -> Result<()> {
    let store = FileUsageStore::new(config.usage_path(data_dir), config.usage.session_key.clone());
    let subscription = store.subscribe(Box::new(|total| {
        println!("Screening sessions run: {}", total);
    }));
    subscription.unsubscribe();
    Ok(())
}

fn cmd_config(config: &Config, init: bool, force: bool) -> Result<()> {
    let path = Config::default_config_path();

    if init {
        if path.exists() && !force {
            return Err(Error::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        Config::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    println!("# {}", path.display());
    print!("{}", contents);
    Ok(())
}

/// Count this run once; a failing counter never blocks the printed result
fn record_usage(data_dir: &Path, config: &Config, enabled: bool) {
    if !enabled {
        return;
    }

    let store = FileUsageStore::new(config.usage_path(data_dir), config.usage.session_key.clone());
    let mut session = Session::new();
    if let Err(e) = store.increment_once_per_session(&mut session) {
        tracing::warn!("Failed to update usage counter: {}", e);
    }
}
