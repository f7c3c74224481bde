//! Errors reported by the `pdep` binary.
//! `pdep` 可执行文件报告的错误。

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{failed} of {total} file(s) failed to parse")]
    ParseFailed { failed: usize, total: usize },

    #[error("cannot serialize syntax tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
}
