use clap::Parser;
use colored::*;
use std::process::ExitCode;

use debug_cli::{logging::init_tracing, run, Cli};
use error_common::{codes, log_error};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.json_logs) {
        eprintln!("{} {}", "error:".bright_red(), e);
        return exit_code(e.exit_code());
    }

    match run(&cli).await {
        Ok(rendered) => {
            println!("{}", rendered);
            exit_code(codes::SUCCESS)
        }
        Err(e) => {
            log_error("zanzibar-debug", &e);
            eprintln!("{} {}", "error:".bright_red(), e);
            exit_code(e.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
