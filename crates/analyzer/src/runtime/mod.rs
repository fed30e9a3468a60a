//! Runtime module — command-line lifecycle: boot, run.

pub mod boot;
pub mod cli;
pub mod run;
