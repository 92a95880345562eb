use crate::demo::{run_demo, run_estimate, run_nets_report, DemoArgs, EstimateArgs, NetsReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use yks_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "yks-score",
    about = "Estimate YKS placement scores and ranks, and track practice-exam nets",
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
    /// Score one answer sheet and print the estimated ranks
    Estimate(EstimateArgs),
    /// Practice-exam net tools
    Nets {
        #[command(subcommand)]
        command: NetsCommand,
    },
    /// Walk through a sample sheet and a sample net history
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum NetsCommand {
    /// Summarize a CSV export of practice-exam nets per subject
    Report(NetsReportArgs),
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
        Command::Estimate(args) => run_estimate(args),
        Command::Nets {
            command: NetsCommand::Report(args),
        } => run_nets_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
