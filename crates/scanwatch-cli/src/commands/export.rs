use std::path::{Path, PathBuf};

use chrono::Local;
use scanwatch_core::config::ClientConfig;
use scanwatch_core::export::{render_scans_export, suggested_export_file_name};
use scanwatch_core::view::{project, SortKey};

use crate::cli::ExportFormat;
use crate::commands::common::load_engine;
use crate::error::CliError;

pub async fn run_export(
    config: &ClientConfig,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let engine = load_engine(config).await?;
    let records = project(engine.cache(), "", SortKey::Newest);
    let rendered = render_scans_export(&records, format.into())?;

    if let Some(path) = output_path {
        let path = resolve_export_path(path, format);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{}", rendered.trim_end());
    }

    Ok(())
}

/// A directory target gets a timestamped file name inside it.
pub fn resolve_export_path(path: &Path, format: ExportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(
            format.into(),
            Local::now().naive_local(),
        ))
    } else {
        path.to_path_buf()
    }
}
