use anyhow::{Context, Result};
use clap::Parser;
use packlist::{
    config::{Cli, Command, OutputArgs},
    fetch::ExtractionClient,
    preview, Outcome,
};
use serde_json::Value;
use std::{fs, io::Write, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ─── 1) env + logging ────────────────────────────────────────────
    let _ = dotenvy::dotenv();
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ─── 2) settle one request into an outcome ──────────────────────
    let (outcome, output) = match cli.command {
        Command::Preview { file } => {
            let summary = preview::describe(&file)?;
            print!("{}", summary.render());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Submit(args) => {
            let client = ExtractionClient::new(args.endpoint_url()?, args.api_key.clone());
            let request = args.upload_request();
            info!(file = ?request.file, endpoint = %client.endpoint(), "submitting");
            (Outcome::settle(client.submit(&request).await), args.output)
        }
        Command::Render(args) => {
            let text = fs::read_to_string(&args.response)
                .with_context(|| format!("reading {:?}", args.response))?;
            let response: Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {:?}", args.response))?;
            (Outcome::from_response(&response), args.output)
        }
    };

    // ─── 3) show it, and export when there is a table ───────────────
    emit(&outcome, &output)?;

    if outcome.is_error() {
        error!("submission failed");
        return Ok(ExitCode::FAILURE);
    }
    info!("done");
    Ok(ExitCode::SUCCESS)
}

fn emit(outcome: &Outcome, output: &OutputArgs) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(outcome.render(output.format)?.as_bytes())?;
    stdout.flush()?;

    if let (Some(dir), Some(list)) = (&output.out, outcome.packing_list()) {
        let path = list.csv_document(&output.name).write_to(dir)?;
        info!(path = %path.display(), "csv exported");
    }
    Ok(())
}
