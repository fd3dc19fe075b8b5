//! Policy synthesis (deterministic statement generation)

pub mod policy_builder;

pub use policy_builder::{build_edge_log_statement, EDGE_LOG_ACTIONS, EDGE_LOG_RESOURCE};
