use std::{io, path::PathBuf};

use thiserror::Error;

use crate::output::Artifact;

/// Failure while producing artifact text in memory.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to render the HTML document: {0}")]
    Template(#[from] handlebars::RenderError),
    #[error("failed to format the schema source: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Failure while writing one artifact. Other artifacts are unaffected.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{artifact} already exists at {}; refusing to overwrite", .path.display())]
    Exists { artifact: Artifact, path: PathBuf },
    #[error("failed to write {artifact} to {}: {source}", .path.display())]
    Io {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OutputError {
    pub fn artifact(&self) -> Artifact {
        match self {
            OutputError::Exists { artifact, .. } | OutputError::Io { artifact, .. } => *artifact,
        }
    }
}
