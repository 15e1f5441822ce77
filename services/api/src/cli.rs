use crate::demo::{run_demo, run_recommend, run_score, DemoArgs, RecommendArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wellness_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wellness Portal",
    about = "Serve and exercise the wellness portal's preventive-care and scoring workflows",
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
    /// Evaluate preventive screening rules for a patient profile stored as JSON
    Recommend(RecommendArgs),
    /// Compute a daily wellness score
    Score(ScoreArgs),
    /// Run an end-to-end demo with sample patients and a week of wellness logs
    Demo(DemoArgs),
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
        Command::Recommend(args) => run_recommend(args),
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
