use anyhow::Result;
use trend_forecast_web_api::ApiServer;

use crate::context::AppContext;

/// Serves the HTTP API until the process is stopped.
///
/// # Errors
/// Returns an error if the listener cannot bind.
pub async fn run_serve(ctx: &AppContext, addr: Option<&str>) -> Result<()> {
    let addr = addr.map_or_else(|| ctx.config.server.addr(), str::to_string);
    let server = ApiServer::new(ctx.pipeline.clone());

    tracing::info!("Starting forecast server on {}", addr);
    server.serve(&addr).await
}
