use scanwatch_core::config::ClientConfig;

use crate::commands::common::{confirm, load_engine};
use crate::error::CliError;

pub async fn run_clear(config: &ClientConfig, yes: bool) -> Result<(), CliError> {
    let mut engine = load_engine(config).await?;
    let count = engine.cache().len();

    if !yes {
        let prompt = format!(
            "Clear all {count} scans on {}? This cannot be undone.",
            engine.api().base_url()
        );
        if !confirm(&prompt)? {
            return Err(CliError::Aborted);
        }
    }

    engine.clear_all().await?;
    println!("Cleared {count} scans");
    Ok(())
}
