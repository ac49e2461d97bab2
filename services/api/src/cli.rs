use crate::demo::{run_demo, run_quote, run_rates, run_report, QuoteArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use taxdesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "taxdesk",
    about = "Price tax-preparation engagements and review report insights from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Calculate a quote with upsell recommendations
    Quote(QuoteArgs),
    /// Print the active rate tables as JSON
    Rates,
    /// Apply insight rules to report metrics
    Report(ReportArgs),
    /// Walk through sample quotes and reports
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Rates => run_rates(),
        Command::Report(args) => run_report(args),
        Command::Demo => run_demo(),
    }
}
