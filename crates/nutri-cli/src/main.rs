mod commands;
mod output;

use clap::{Parser, Subcommand};
use nutri_core::config::Config;
use nutri_core::error::NutriError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nutri",
    version,
    about = "Barcode nutrition grading and ingredient classification"
)]
struct Cli {
    /// Directory holding the local account store (overrides NUTRI_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Scoring preset name or scoring profile JSON file (overrides NUTRI_SCORING)
    #[arg(long, global = true, value_name = "NAME")]
    scoring: Option<String>,

    /// Ingredient keyword table JSON file (overrides NUTRI_KEYWORDS)
    #[arg(long, global = true, value_name = "FILE")]
    keywords: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a product by barcode and grade it
    Lookup {
        barcode: String,

        /// Only query the offline demonstration source
        #[arg(long)]
        demo: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Grade and classify a product stored as Open Food Facts JSON
    Analyze {
        /// Product envelope (`{"product": {...}}`) or bare product object
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Classify a comma-separated ingredients list
    Classify {
        /// Ingredients text, e.g. "Sugar, Wheat Flour, Salt"
        #[arg(required = true)]
        ingredients: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Look up two products and compare them
    Compare {
        left: String,
        right: String,

        /// Only query the offline demonstration source
        #[arg(long)]
        demo: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Read barcodes from stdin and look each one up; only the latest result is shown
    Scan {
        /// Only query the offline demonstration source
        #[arg(long)]
        demo: bool,
    },
    /// Inspect and validate rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
    /// Sign up, sign in and out
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage registered users (admin session required)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List scoring presets and the ingredient keyword table
    List,
    /// Explain a scoring preset, or "keywords" for the ingredient table
    Explain { preset: String },
    /// Print the rule file JSON schemas
    Schema,
    /// Validate a custom rule file
    Validate {
        file: PathBuf,

        /// Rule file kind: scoring (default) or keywords
        #[arg(long, default_value = "scoring")]
        kind: String,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Register a new user
    Signup {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Password confirmation (prompted on stdin when omitted)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Sign in as a user or the admin
    Login {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Print a bcrypt hash for NUTRI_ADMIN_PASSWORD_HASH
    HashPassword {
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List registered users
    Users,
    /// Change a user's email and password
    Edit {
        email: String,
        new_email: String,
        /// New password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove a user
    Delete { email: String },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, NutriError> {
    let mut config = Config::from_env()?;
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(ref scoring) = cli.scoring {
        config.scoring = scoring.clone();
    }
    if let Some(ref keywords) = cli.keywords {
        config.keywords = Some(keywords.clone());
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), NutriError> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Lookup {
            barcode,
            demo,
            output,
        } => commands::lookup::run(&config, &barcode, demo, &output),
        Commands::Analyze { input_file, output } => {
            commands::analyze::run(&config, &input_file, &output)
        }
        Commands::Classify {
            ingredients,
            output,
        } => commands::classify::run(&config, &ingredients.join(" "), &output),
        Commands::Compare {
            left,
            right,
            demo,
            output,
        } => commands::lookup::compare(&config, &left, &right, demo, &output),
        Commands::Scan { demo } => commands::scan::run(&config, demo),
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Explain { preset } => commands::rules::explain(&preset),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file, kind } => commands::rules::validate(&file, &kind),
        },
        Commands::Account { action } => match action {
            AccountAction::Signup {
                email,
                password,
                confirm,
            } => commands::account::signup(&config, &email, password, confirm),
            AccountAction::Login { email, password } => {
                commands::account::login(&config, &email, password)
            }
            AccountAction::Logout => commands::account::logout(&config),
            AccountAction::Whoami => commands::account::whoami(&config),
            AccountAction::HashPassword { password } => {
                commands::account::hash_password(&config, password)
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Users => commands::account::list_users(&config),
            AdminAction::Edit {
                email,
                new_email,
                password,
            } => commands::account::edit_user(&config, &email, &new_email, password),
            AdminAction::Delete { email } => commands::account::delete_user(&config, &email),
        },
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
