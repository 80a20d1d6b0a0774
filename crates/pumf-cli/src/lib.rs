//! Library side of the `pumf-recode` command: logging setup, run types and
//! the staged run pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;
