use std::path::PathBuf;

use clap::Parser;
use reminders::Config;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(about = "Reminders API server")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Path of the reminders database file
    #[arg(long, default_value = "db.json")]
    db_path: PathBuf,

    /// Path of the database config file (id counter and checksum)
    #[arg(long, default_value = "db.cfg.json")]
    db_cfg_path: PathBuf,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    reminders::run(Config {
        addr: args.addr,
        db_path: args.db_path,
        db_cfg_path: args.db_cfg_path,
    })
}
