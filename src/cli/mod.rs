pub mod commands;

pub use commands::{LogArgs, QualityGateArgs, WriteBuildsetArgs};
