// src/main.rs

use fleetsim::{cli, logging, run, RunStatus};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(RunStatus::Success) => {}
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("fleetsim error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<RunStatus> {
    let args = cli::parse();
    logging::init_logging(args.log_level, args.log_format)?;
    run(args).await
}
