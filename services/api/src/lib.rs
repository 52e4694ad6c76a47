mod analyze;
mod cli;
mod infra;
mod routes;
mod server;

use chargeback_ai::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
