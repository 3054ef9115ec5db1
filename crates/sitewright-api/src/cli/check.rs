//! Provider connectivity check.

use anyhow::Result;
use console::style;

use sitewright_infra::llm::test_provider_connection;

use crate::cli::spinner;
use crate::state::AppState;

/// Send a minimal request through the builder provider and report the result.
pub async fn check_provider(state: &AppState, json: bool) -> Result<()> {
    let checking = spinner("Contacting provider...");
    let result = test_provider_connection(&state.builder).await;
    checking.finish_and_clear();

    if json {
        let out = serde_json::json!({
            "provider": state.builder.name(),
            "model": state.config.builder_model,
            "healthy": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    match &result {
        Ok(()) => println!(
            "  {} {} answered ({})",
            style("✓").green(),
            style(state.builder.name()).cyan(),
            style(&state.config.builder_model).dim()
        ),
        Err(e) => println!(
            "  {} {} failed: {e}",
            style("✗").red(),
            style(state.builder.name()).cyan()
        ),
    }
    println!();

    result.map_err(Into::into)
}
