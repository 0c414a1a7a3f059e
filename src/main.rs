use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use taazabites_ai::TaazaError;
use taazabites_ai::cli::commands::{config, widgets};
use taazabites_ai::cli::{CommandContext, OutputFormat};
use taazabites_ai::studio::MealPlanRequest;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse a `YYYY-MM-DD` date
fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
}

#[derive(Parser)]
#[command(name = "taazabites")]
#[command(
    version,
    about = "AI completion gateway and content widgets for the Taazabites website"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,

    #[arg(
        short = 'f',
        long,
        global = true,
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a one-day meal plan from the menu
    MealPlan {
        #[arg(long, help = "Health goal (e.g. 'Weight Loss')")]
        goal: String,
        #[arg(
            long = "diet",
            value_delimiter = ',',
            help = "Dietary preferences, comma separated"
        )]
        dietary_preferences: Vec<String>,
        #[arg(long, default_value = "", help = "Foods to avoid")]
        dislikes: String,
        #[arg(long = "nutrition", default_value = "", help = "Nutritional targets")]
        nutritional_goals: String,
    },

    /// Generate a home workout with a recommended meal
    Workout {
        #[arg(help = "Fitness goal (e.g. 'Build Strength')")]
        goal: String,
        #[arg(long, help = "Save the plan as JSON for later swaps")]
        save: Option<PathBuf>,
    },

    /// Replace one exercise in a saved workout plan
    SwapExercise {
        #[arg(long, help = "Workout plan JSON file")]
        plan: PathBuf,
        #[arg(long, help = "Exercise number, starting at 1")]
        index: usize,
        #[arg(long, help = "Fitness goal the plan was built for")]
        goal: String,
    },

    /// Customer testimonials (falls back to static ones)
    Testimonials,

    /// Hero headline rotation
    Hero,

    /// SEO meta description for a day
    Meta {
        #[arg(long, value_parser = parse_date, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<chrono::NaiveDate>,
    },

    /// Answer a site search query
    Search {
        #[arg(help = "Question about Taazabites")]
        query: String,
    },

    /// Suggest a dish for a craving
    Suggest {
        #[arg(help = "What you feel like eating")]
        craving: String,
    },

    /// Ingredient spotlight (falls back to a static one)
    Spotlight,

    /// "How it works" steps
    HowItWorks,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mtaazabites encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Gateway errors carry a message meant for the end user
            match e.downcast_ref::<TaazaError>() {
                Some(err) => {
                    tracing::debug!(error = %err, attempts = err.attempts(), "Command failed");
                    eprintln!("\x1b[31mError:\x1b[0m {}", err.user_message());
                }
                None => eprintln!("\x1b[31mError:\x1b[0m {}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show { global } => config::show(global, format)?,
            ConfigAction::Path => config::path()?,
            ConfigAction::Init { global, force } => config::init(global, force)?,
        },
        command => {
            let ctx = CommandContext::load()?;
            let rt = Runtime::new()?;
            rt.block_on(run_widget(&ctx, command, format))?;
        }
    }

    Ok(())
}

async fn run_widget(
    ctx: &CommandContext,
    command: Commands,
    format: OutputFormat,
) -> taazabites_ai::Result<()> {
    match command {
        Commands::MealPlan {
            goal,
            dietary_preferences,
            dislikes,
            nutritional_goals,
        } => {
            let request = MealPlanRequest {
                dietary_preferences,
                health_goal: goal,
                dislikes,
                nutritional_goals,
            };
            widgets::meal_plan(ctx, &request, format).await
        }
        Commands::Workout { goal, save } => {
            widgets::workout(ctx, &goal, save.as_deref(), format).await
        }
        Commands::SwapExercise { plan, index, goal } => {
            widgets::swap_exercise(ctx, &plan, &goal, index, format).await
        }
        Commands::Testimonials => widgets::testimonials(ctx, format).await,
        Commands::Hero => widgets::hero(ctx, format).await,
        Commands::Meta { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            widgets::meta(ctx, date, format).await
        }
        Commands::Search { query } => widgets::search(ctx, &query, format).await,
        Commands::Suggest { craving } => widgets::suggest(ctx, &craving, format).await,
        Commands::Spotlight => widgets::spotlight(ctx, format).await,
        Commands::HowItWorks => widgets::how_it_works(ctx, format).await,
        Commands::Config { .. } => Ok(()),
    }
}
