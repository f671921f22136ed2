//! klaunch CLI: local Kafka/MongoDB stack bootstrap helpers
//!
//! All CLI logic lives in the `cli` module. This file is just the entry point.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(err) = cli::run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(cli::exit_code(&err));
    }
}
