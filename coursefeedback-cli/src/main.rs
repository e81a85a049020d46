mod serve;
mod server;

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use coursefeedback_lib::{FeedbackRepository, JsonFileStore, Validation};
use tracing_subscriber::EnvFilter;

use crate::serve::ServeArgs;
use crate::server::config::{default_data_file, StorageBackend};

#[derive(Parser, Debug)]
#[command(name = "feedback")]
#[command(version)]
#[command(about = "Collect and review student course feedback", long_about = None)]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the feedback HTTP API
    Serve {
        /// Port to listen on
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,

        /// Address to bind
        #[arg(short = 'H', long = "hostname")]
        hostname: Option<String>,

        /// Path to the JSON data file
        #[arg(short = 'd', long = "data-file")]
        data_file: Option<String>,

        /// Storage backend: file or memory
        #[arg(short = 's', long = "storage")]
        storage: Option<StorageBackend>,

        /// Submission validation: strict or none
        #[arg(short = 'v', long = "validation")]
        validation: Option<Validation>,

        /// Path to config file
        #[arg(short = 'c', long = "config", default_value = "feedback.toml")]
        config: String,
    },
    /// Print stored feedback, newest first
    List {
        /// Path to the JSON data file
        #[arg(short = 'd', long = "data-file", default_value_t = default_data_file())]
        data_file: String,
    },
    /// Print rating and course statistics as JSON
    Stats {
        /// Path to the JSON data file
        #[arg(short = 'd', long = "data-file", default_value_t = default_data_file())]
        data_file: String,
    },
    /// Delete one feedback entry by id
    Delete {
        /// Id of the entry to remove
        id: i64,

        /// Path to the JSON data file
        #[arg(short = 'd', long = "data-file", default_value_t = default_data_file())]
        data_file: String,
    },
}

fn open_repository(data_file: &str) -> FeedbackRepository {
    FeedbackRepository::new(Arc::new(JsonFileStore::new(data_file)), Validation::Strict)
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}

async fn run_list(data_file: &str) {
    let records = open_repository(data_file)
        .list_all()
        .await
        .unwrap_or_else(|e| fail(e));
    if records.is_empty() {
        println!("No feedback in {}", data_file);
        return;
    }
    for r in &records {
        println!(
            "{}  {}  {}  {}/5  {}",
            r.id,
            coursefeedback_lib::model::iso_millis(&r.created_at),
            r.course_code,
            r.rating,
            r.student_name
        );
        println!("    {}", r.comments);
    }
    println!();
    println!("{} entries", records.len());
}

async fn run_stats(data_file: &str) {
    let info = open_repository(data_file)
        .database_info()
        .await
        .unwrap_or_else(|e| fail(e));
    match serde_json::to_string_pretty(&info) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}

async fn run_delete(data_file: &str, id: i64) {
    let deleted = open_repository(data_file)
        .delete_by_id(id)
        .await
        .unwrap_or_else(|e| fail(e));
    if deleted {
        println!("Deleted feedback {}", id);
    } else {
        eprintln!("Feedback {} not found in {}", id, data_file);
        process::exit(1);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Args::parse();
    match cli.cmd {
        Command::Serve {
            port,
            hostname,
            data_file,
            storage,
            validation,
            config,
        } => {
            serve::run_serve(ServeArgs {
                port,
                hostname,
                data_file,
                storage,
                validation,
                config_path: config,
            })
            .await
        }
        Command::List { data_file } => run_list(&data_file).await,
        Command::Stats { data_file } => run_stats(&data_file).await,
        Command::Delete { id, data_file } => run_delete(&data_file, id).await,
    }
}
