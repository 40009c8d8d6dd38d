use clap::Parser;
use exec_credential::commands::exec_credential::ExecCredentialCommand;
use exec_credential::fetcher::CredentialFetcher;
use exec_credential::http::client::HttpClient;
use exec_credential::logging;
use exec_credential::parameters::Cli;
use std::error::Error;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    logging::init(cli.verbose).map_err(|e| format!("error initializing logging: {}", e))?;

    let fetch_config = cli.fetch_config()?;
    let http_client = HttpClient::new(cli.http_config())
        .map_err(|e| format!("error creating http client: {}", e))?;

    let command = ExecCredentialCommand::new(CredentialFetcher::new(http_client))
        .with_kind_field(cli.kind_field());
    command.run(&fetch_config, &mut io::stdout().lock())?;

    Ok(())
}
