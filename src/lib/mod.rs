//! Shared library modules providing error types, dotenv resolution, executable lookup, and telemetry.

pub mod envfile;
pub mod errors;
pub mod paths;
pub mod telemetry;
