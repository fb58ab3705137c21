//! Library side of the `cstat` command-line tool.
//!
//! - **logging**: tracing subscriber setup
//! - **pipeline**: file-to-file stage runners and the end-to-end run

pub mod logging;
pub mod pipeline;
