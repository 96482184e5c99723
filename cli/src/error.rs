use std::io;

use booking_core::views::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not determine a data directory; pass --session-file")]
    NoDataDir,

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Invalid(#[from] FieldError),

    /// A view reported a failure; the text is what the user should see.
    #[error("{0}")]
    Failed(String),
}
