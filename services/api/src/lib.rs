mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use ezy_property::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
