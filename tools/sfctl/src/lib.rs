//! Configuration and output rendering behind the `sfctl` binary.

pub mod output;
pub mod settings;
