use clap::Parser;
use sketch::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version go to stdout and are not failures
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    let result = cli
        .mode()
        .map_err(anyhow::Error::from)
        .and_then(sketch::app::run);

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("fatal: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
