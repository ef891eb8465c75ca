//! Core engine for mortgage application origination.
//!
//! The crate owns the application lifecycle from intake through automated
//! decisioning: financial metric calculators, the composite risk score, the
//! underwriting gates, the status state machine, and the audit trail that
//! records every move. Persistence and outbound audit dispatch sit behind
//! traits so binaries and tests can supply their own adapters.

pub mod clock;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
