use clap::{Parser, Subcommand};
use log::{error, info};

use wtp_monitor::*;
use wtp_monitor::config::{DbConfig, VerificationFixture};
use wtp_monitor::verification::{Phase, VerificationReport};

#[derive(Parser)]
#[command(
    name = "wtp_monitor",
    about = "Water treatment plant monitoring database tools",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Create every monitoring table that does not exist yet.
    Bootstrap,
    /// Check triggers and stored procedures against the database (default).
    Verify,
}

impl Cli {
    fn command(&self) -> Command {
        self.command.unwrap_or(Command::Verify)
    }
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = DbConfig::from_env();

    let code = match cli.command() {
        Command::Bootstrap => bootstrap(config),
        Command::Verify => verify(config),
    };

    std::process::exit(code);
}

fn bootstrap(config: DbConfig) -> i32 {
    let res = Database::connect(config).and_then(|db| db.setup_migrations());
    match res {
        Ok(()) => 0,
        Err(err) => {
            error!("Bootstrap failed: {}", err);
            1
        },
    }
}

fn verify(config: DbConfig) -> i32 {
    let report = match Database::connect(config) {
        Ok(db) => verification::run(&db, &VerificationFixture::default()),
        Err(err) => {
            let mut report = VerificationReport::default();
            report.record(Phase::Connect, Err(format!("cannot create the connection pool: {}", err)));
            report
        },
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(err) => error!("Cannot serialize the report: {}", err),
    }

    if report.passed() {
        info!("Verification completed, every phase passed");
        0
    } else {
        error!("Verification completed with {} failed phase(s)", report.failures().count());
        1
    }
}
