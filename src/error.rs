use std::io;
use thiserror::Error;

/// Errors produced while turning PGN games into training data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The input stream could not be opened or decoded. Recoverable at the
    /// corpus level by skipping the file.
    #[error("cannot read game source {path}: {source}")]
    SourceRead { path: String, source: io::Error },

    /// A recorded move cannot be applied to the position it was recorded in.
    /// Recoverable at the game level by discarding the game.
    #[error("illegal move {san} at ply {ply}")]
    IllegalMove { san: String, ply: usize },

    /// The output sink failed. Fatal, partial corpora are not resumable.
    #[error("cannot write dataset {path}: {source}")]
    OutputWrite { path: String, source: io::Error },
}
