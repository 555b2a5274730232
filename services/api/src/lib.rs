mod cli;
mod infra;
mod interview;
mod routes;
mod screen;
mod server;

use benefit_screener::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
