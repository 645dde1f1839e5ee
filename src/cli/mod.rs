//! CLI support for treebuilder
//!
//! Provides programmatic access to the `treebuilder` commands so a tree
//! script can be run without spawning the binary.

mod build;
mod convert;
mod docs;

pub use build::{BuildOptions, BuildResult, Format, Op, Operation, execute_build, parse_script};
pub use convert::{json_to_node, json_to_value};
pub use docs::{DocTopic, get_doc_topic, get_docs_overview};

use std::io;

use thiserror::Error;

use crate::{PathError, TreeError};

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("operation {index}: {message}")]
    Operation { index: usize, message: String },

    #[error("operation {index}: {source}")]
    Path { index: usize, source: PathError },

    #[error("operation {index}: {source}")]
    Tree { index: usize, source: TreeError },

    #[error(transparent)]
    Export(TreeError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("no script provided. Use --script or pipe a JSON script to stdin.")]
    NoInput,

    #[error("unknown topic: '{0}'\nRun 'treebuilder docs' to see available topics.")]
    UnknownTopic(String),
}
