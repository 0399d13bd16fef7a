use thiserror::Error;

/// Top-level error type for the CLI binary. Lower-crate errors convert in
/// via `#[from]`; `main` maps each variant to an exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("input directory not found or unreadable: {0}")]
    InputMissing(String),

    #[error(transparent)]
    Core(#[from] dedup_core::CoreError),

    #[error(transparent)]
    Embed(#[from] dedup_engine::EmbedError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write csv output: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write summary.json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process exit code for a given failure, per the documented exit-code table.
/// `Embedder-unavailable` never reaches here — it is recovered in-process.
pub fn exit_code(err: &CliError) -> i32 {
    match err {
        CliError::InputMissing(_) => 2,
        CliError::Core(_) => 2,
        CliError::Embed(_) => 3,
        CliError::Io(_) | CliError::Csv(_) | CliError::Json(_) => 4,
    }
}
