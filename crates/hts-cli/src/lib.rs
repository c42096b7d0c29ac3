//! Library components of the `hts-risk` command-line tool.

pub mod input;
pub mod logging;
pub mod render;
