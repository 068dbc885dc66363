use clap::{Parser, Subcommand};
use reminders::client::HttpClient;
use tracing::Level;

#[derive(Parser)]
#[command(name = "reminders-cli")]
#[command(about = "Command line client for the reminders API", long_about = None)]
struct Cli {
    /// Backend API URL
    #[arg(short, long, default_value = "http://localhost:8080")]
    backend: String,

    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a reminder
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        message: String,
        /// Seconds until the reminder is due
        #[arg(short, long)]
        duration: u64,
    },
    /// Edit fields of a reminder
    Edit {
        #[arg(short, long)]
        id: u64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(short, long)]
        duration: Option<u64>,
    },
    /// Fetch reminders by id
    Fetch {
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<u64>,
    },
    /// Delete reminders by id
    Delete {
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<u64>,
    },
    /// Check the backend is up
    Health,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let client = HttpClient::new(cli.backend);
    match cli.command {
        Commands::Create {
            title,
            message,
            duration,
        } => println!("{}", client.create(&title, &message, duration)?),
        Commands::Edit {
            id,
            title,
            message,
            duration,
        } => println!(
            "{}",
            client.edit(id, title.as_deref(), message.as_deref(), duration)?
        ),
        Commands::Fetch { ids } => println!("{}", client.fetch(&ids)?),
        Commands::Delete { ids } => {
            client.delete(&ids)?;
            println!("deleted");
        }
        Commands::Health => {
            if client.healthy() {
                println!("ok");
            } else {
                anyhow::bail!("backend is not healthy");
            }
        }
    }
    Ok(())
}
