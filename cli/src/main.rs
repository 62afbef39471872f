mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, build, hosts};
use terminal::{logging, print};
use tracing::error;

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.debug);

    let result = match commands.command {
        Commands::Build(args) => {
            print::header("getting ready to build");
            build::build(args)
        }
        Commands::Hosts(args) => {
            print::header("generating servers");
            hosts::hosts(args).map(|()| ExitCode::SUCCESS)
        }
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    };
    print::end_of_program();
    code
}
