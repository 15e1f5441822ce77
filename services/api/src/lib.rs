mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use wellness_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
