use oracle_core::cli;
use oracle_core::commands::{error_report, run_command, CommandOutput};
use std::process::exit;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (config, args) = cli::get_configuration_from_cli();
    tracing::debug!("Running {:?} with {:?}", args.command, config);

    let output = match run_command(&config, &args.command) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            eprintln!("{}", error_report(&e));
            exit(1);
        }
    };

    match output {
        CommandOutput::Status(status) => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        CommandOutput::Events(events) => {
            for event in events {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
    }

    Ok(())
}
