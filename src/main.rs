//! workflow-lite
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ cli ──▶ config::validation ──▶ config::search_attributes
//!                                                   │
//!                                                   ▼
//!   exit ◀── lifecycle::startup ◀── server ◀── options::compose
//!                   ▲                  ▲
//!                   │                  │
//!            lifecycle::signals ──▶ interrupt hook
//! ```

use std::process::ExitCode;

use workflow_lite::lifecycle::Bootstrap;
use workflow_lite::server::LiteServerFactory;

#[tokio::main]
async fn main() -> ExitCode {
    let bootstrap = Bootstrap::new(LiteServerFactory);

    match bootstrap.run(std::env::args_os()).await {
        Ok(completed) => {
            println!("{}", completed.message);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("{}", failure.message);
            ExitCode::from(failure.exit_code)
        }
    }
}
