use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use scorecard_engine::config::Config;
use scorecard_engine::handoff::{build_payload, PlanClient};
use scorecard_engine::leads::{submit_lead, LeadSubmission};
use scorecard_engine::scorecard::{
    parse_scorecard, write_template, ScorecardConfig, ScorecardError, ScorecardRegistry,
    DEFAULT_SLUG,
};
use scorecard_engine::scoring::{diagnose, Answers, ScoreResult};
use scorecard_engine::survey::Prompter;
use scorecard_engine::{browser, config, output, transport};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Args, Debug)]
struct DeliveryArgs {
    /// Send the result to the plan-generation service
    #[arg(long)]
    submit: bool,

    /// Email address to send the action plan to
    #[arg(long)]
    email: Option<String>,

    /// Open the returned plan in the browser
    #[arg(long, requires = "submit")]
    open: bool,

    /// Print the diagnosis as JSON instead of the report
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available scorecards
    List,
    /// Show a scorecard's questions grouped by pillar
    Show {
        slug: String,
    },
    /// Answer a scorecard interactively and get the diagnosis
    Take {
        /// Scorecard to run (prompts when omitted)
        slug: Option<String>,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Score a YAML map of question id to score (1-5)
    Score {
        slug: String,
        /// YAML file such as `q1: 4`
        #[arg(long)]
        answers: PathBuf,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Write a starter scorecard YAML
    Init {
        path: PathBuf,
        /// Slug for the new scorecard
        #[arg(long, default_value = "my-scorecard")]
        slug: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate a scorecard YAML file and print every problem found
    Validate {
        file: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "scorecard")]
#[command(about = "Marketing self-assessment scorecards", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/scorecard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Commands that work on a file and need no app config
    match &cli.command {
        Commands::Init { path, slug, force } => {
            if let Err(e) = write_template(path, slug, *force) {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Wrote starter scorecard '{}' to {}", slug, path.display());
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Validate { file } => {
            std::process::exit(validate_file(file));
        }
        _ => {}
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let app_config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate app config at startup
    if let Err(errors) = config::validate_app_config(&app_config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let registry = match load_registry(&app_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scorecard error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(scorecards = ?registry.slugs(), "registry ready");

    let use_colors = output::should_use_colors();

    let code = match cli.command {
        Commands::List => {
            println!("{}", output::format_scorecard_list(registry.iter(), use_colors));
            EXIT_SUCCESS
        }
        Commands::Show { slug } => {
            let scorecard = find_scorecard(&registry, &slug);
            println!("{}", output::format_scorecard_detail(scorecard, use_colors));
            EXIT_SUCCESS
        }
        Commands::Take { slug, mut delivery } => {
            let mut prompter = Prompter::stdio();

            let slug = match slug {
                Some(s) => s,
                None => {
                    println!("{}\n", output::format_scorecard_list(registry.iter(), use_colors));
                    match prompter.prompt_with_default("Scorecard", DEFAULT_SLUG) {
                        Ok(s) => s,
                        Err(e) => {
                            eprintln!("{:#}", e);
                            std::process::exit(EXIT_INPUT);
                        }
                    }
                }
            };
            let scorecard = find_scorecard(&registry, &slug);

            let answers = match prompter.collect_answers(scorecard) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let score = match report(scorecard, &answers, &delivery, use_colors) {
                Ok(s) => s,
                Err(code) => std::process::exit(code),
            };

            // Offer follow-ups only when nothing was requested up front
            if !delivery.submit && delivery.email.is_none() && !delivery.json && std::io::stdin().is_terminal() {
                if let Err(e) = offer_follow_ups(&mut prompter, &mut delivery) {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }

            deliver(scorecard, &answers, &score, &delivery, &app_config, use_colors).await
        }
        Commands::Score {
            slug,
            answers,
            delivery,
        } => {
            let scorecard = find_scorecard(&registry, &slug);
            let answers = match read_answers_file(scorecard, &answers) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("Answers error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let score = match report(scorecard, &answers, &delivery, use_colors) {
                Ok(s) => s,
                Err(code) => std::process::exit(code),
            };
            deliver(scorecard, &answers, &score, &delivery, &app_config, use_colors).await
        }
        Commands::Init { .. } | Commands::Validate { .. } => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

/// Built-in scorecards plus any found in the configured directory.
fn load_registry(app_config: &Config) -> anyhow::Result<ScorecardRegistry> {
    let mut registry = ScorecardRegistry::with_builtins()?;
    let dir = app_config
        .scorecards_dir
        .clone()
        .unwrap_or_else(config::get_default_scorecards_dir);
    let loaded = registry.load_dir(&dir)?;
    debug!(dir = %dir.display(), loaded, "loaded scorecards from directory");
    Ok(registry)
}

fn find_scorecard<'a>(registry: &'a ScorecardRegistry, slug: &str) -> &'a ScorecardConfig {
    match registry.get(slug) {
        Some(s) => s,
        None => {
            eprintln!(
                "Unknown scorecard '{}'. Available: {}",
                slug,
                registry.slugs().join(", ")
            );
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn validate_file(file: &Path) -> i32 {
    let yaml = match std::fs::read_to_string(file) {
        Ok(y) => y,
        Err(e) => {
            eprintln!("Failed to read {}: {}", file.display(), e);
            return EXIT_INPUT;
        }
    };

    match parse_scorecard(&yaml) {
        Ok(scorecard) => {
            println!(
                "{}: ok ({}, {} questions)",
                file.display(),
                scorecard.slug,
                scorecard.questions.len()
            );
            EXIT_SUCCESS
        }
        Err(ScorecardError::Invalid { slug, errors }) => {
            eprintln!("{}: scorecard '{}' has {} problem(s):", file.display(), slug, errors.len());
            for error in errors {
                eprintln!("  - {}", error);
            }
            EXIT_CONFIG
        }
        Err(e) => {
            eprintln!("{}: {}", file.display(), e);
            EXIT_CONFIG
        }
    }
}

fn read_answers_file(scorecard: &ScorecardConfig, path: &Path) -> anyhow::Result<Answers> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file at {}", path.display()))?;
    let raw: BTreeMap<String, u8> = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse answers in {}", path.display()))?;

    Ok(Answers::from_map(scorecard, raw)?)
}

/// Print the diagnosis to stdout and hand back the score for delivery.
/// The error is the exit code to use.
fn report(
    scorecard: &ScorecardConfig,
    answers: &Answers,
    delivery: &DeliveryArgs,
    use_colors: bool,
) -> Result<ScoreResult, i32> {
    let diagnosis = match diagnose(scorecard, answers) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Cannot score '{}': {}", scorecard.slug, e);
            return Err(EXIT_INPUT);
        }
    };

    if delivery.json {
        match serde_json::to_string_pretty(&diagnosis) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize diagnosis: {}", e);
                return Err(EXIT_INPUT);
            }
        }
    } else {
        println!("{}", output::format_diagnosis(&diagnosis, scorecard, use_colors));
    }
    Ok(diagnosis.score)
}

fn offer_follow_ups<R, W>(prompter: &mut Prompter<R, W>, delivery: &mut DeliveryArgs) -> anyhow::Result<()>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    prompter.say("")?;
    delivery.submit = prompter.prompt_yes_no("Generate your 90-day plan now?", false)?;
    if delivery.submit {
        delivery.open = prompter.prompt_yes_no("Open it in your browser when ready?", true)?;
    }
    let email = prompter.prompt("Email for the action plan (blank to skip): ")?;
    if !email.is_empty() {
        delivery.email = Some(email);
    }
    Ok(())
}

/// Run the requested plan and lead submissions concurrently. Returns an exit code.
async fn deliver(
    scorecard: &ScorecardConfig,
    answers: &Answers,
    score: &ScoreResult,
    delivery: &DeliveryArgs,
    app_config: &Config,
    use_colors: bool,
) -> i32 {
    if !delivery.submit && delivery.email.is_none() {
        return EXIT_SUCCESS;
    }

    // Reject a malformed email before anything goes out
    let lead = match delivery.email {
        Some(ref email) => match LeadSubmission::new(email, &scorecard.slug, answers) {
            Ok(l) => Some(l),
            Err(e) => {
                eprintln!("{}", e);
                return EXIT_INPUT;
            }
        },
        None => None,
    };

    let payload = if delivery.submit {
        match build_payload(scorecard, answers, score, Utc::now()) {
            Ok(p) => Some(p),
            Err(e) => {
                eprintln!("Cannot build plan request: {}", e);
                return EXIT_INPUT;
            }
        }
    } else {
        None
    };

    let http = match transport::build_http_client(app_config.request_timeout()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            return EXIT_NETWORK;
        }
    };
    let retry_delay = app_config.retry_delay();
    let plan_client = PlanClient::new(http.clone(), app_config.plan_endpoint(), retry_delay);
    let lead_endpoint = app_config.lead_endpoint();

    let plan_fut = async {
        match payload {
            Some(ref p) => Some(plan_client.submit(p).await),
            None => None,
        }
    };
    let lead_fut = async {
        match lead {
            Some(ref l) => Some(submit_lead(&http, lead_endpoint, l, retry_delay).await),
            None => None,
        }
    };
    let (plan_result, lead_result) = tokio::join!(plan_fut, lead_fut);

    let mut code = EXIT_SUCCESS;

    if let Some(result) = plan_result {
        match result {
            Ok(outcome) => {
                eprintln!("{}", output::format_plan_outcome(&outcome, use_colors));
                if delivery.open {
                    if let Err(e) = browser::open_plan(&outcome) {
                        eprintln!("Failed to open browser: {:#}", e);
                    }
                }
            }
            Err(e) => {
                eprintln!("Plan request to {} failed: {}", plan_client.endpoint(), e);
                code = EXIT_NETWORK;
            }
        }
    }

    if let (Some(result), Some(l)) = (lead_result, lead.as_ref()) {
        match result {
            Ok(receipt) => eprintln!("{}", output::format_lead_receipt(&receipt, &l.email)),
            Err(e) => {
                eprintln!("Lead submission failed: {}", e);
                if e.is_network() {
                    code = EXIT_NETWORK;
                }
            }
        }
    }

    code
}
