use clap::Parser;

use wizarr_cli::logging::{self, LogLevel};
use wizarr_cli::{execute, report_exit_code, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(LogLevel::from_flags(cli.quiet, cli.debug, cli.trace));

    let code = match execute(cli).await {
        Ok(report) => report_exit_code(&report),
        Err(e) => {
            e.print();
            e.exit_code()
        }
    };
    std::process::exit(code);
}
