use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use marketpulse_core::theme::ThemePreference;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::context::AppContext;

#[derive(Parser)]
#[command(name = "marketpulse")]
#[command(about = "MarketPulse CLI - session and preference state for the MarketPulse client", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct GlobalOptions {
    /// Configuration file (default: <config dir>/marketpulse/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Authentication service base URL
    #[arg(long, global = true)]
    pub auth_url: Option<String>,

    /// Keep preferences in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Sign in with email and password
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the current session
    Whoami,
    /// Request password reset instructions
    ResetPassword { email: String },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the active theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Select a theme explicitly
    Set { theme: ThemePreference },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("marketpulse={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let context = AppContext::bootstrap(&cli.global)?;
    let result = match cli.command {
        Commands::Theme { action } => {
            commands::theme::run(&context, action.unwrap_or(ThemeAction::Show))
        }
        Commands::Login { email, password } => {
            commands::session::login(&context, &email, password).await
        }
        Commands::Signup {
            name,
            email,
            dob,
            password,
        } => commands::session::signup(&context, &name, &email, &dob, password).await,
        Commands::Logout => commands::session::logout(&context),
        Commands::Whoami => commands::session::whoami(&context),
        Commands::ResetPassword { email } => commands::reset::run(&email),
    };
    context.shutdown();

    result
}
