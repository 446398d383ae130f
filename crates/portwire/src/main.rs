mod cmd;
mod logging;

use clap::Parser;
use portwire::ExitStatus;

use crate::cmd::{ChannelArgs, Command};
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "portwire", version, about = "Port worker for length-prefixed term packets")]
struct Cli {
    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        env = "PORTWIRE_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "PORTWIRE_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(flatten)]
    channel: ChannelArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // help and --version land here too; only real parse errors fail
            let code = if err.use_stderr() {
                ExitStatus::LibraryInit.code()
            } else {
                ExitStatus::Success.code()
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_logging(cli.log_format, cli.log_level);

    let result = cmd::run(cli.command.unwrap_or_default(), &cli.channel);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.status.code());
        }
    }
}
