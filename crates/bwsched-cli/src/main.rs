use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bwsched", version, about = "Time-driven bandwidth profile scheduler")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "bwsched_core=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Speed profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Schedule entry management
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print the profile and legacy alternative-limits state for an instant
    Resolve(commands::resolve::ResolveArgs),
    /// Run the scheduler and print each announcement as a JSON line
    Watch(commands::watch::WatchArgs),
}

/// Initializes the tracing subscriber, logging to stderr.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Entry { action } => commands::entry::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Resolve(args) => commands::resolve::run(args),
        Commands::Watch(args) => commands::watch::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
