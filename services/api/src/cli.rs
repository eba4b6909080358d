use crate::demo::{run_demo, run_loan_projection, DemoArgs, LoanProjection, LoanProjectionArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ezy_property::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Ezy Property API",
    about = "Run the cheque collection mock API and loan functions from the command line",
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
    /// Print a security-deposit loan projection
    Loans {
        #[command(subcommand)]
        command: LoanCommand,
    },
    /// Walk a cheque collection request from draft to bank pickup
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LoanCommand {
    /// Generate the installment schedule for an application
    Schedule(LoanProjectionArgs),
    /// Generate the event timeline for an application
    Timeline(LoanProjectionArgs),
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
        Command::Loans {
            command: LoanCommand::Schedule(args),
        } => run_loan_projection(args, LoanProjection::Schedule),
        Command::Loans {
            command: LoanCommand::Timeline(args),
        } => run_loan_projection(args, LoanProjection::Timeline),
        Command::Demo(args) => run_demo(args).await,
    }
}
