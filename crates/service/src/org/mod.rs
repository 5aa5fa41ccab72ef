//! Organization-scoped structure: which catalog items an organization uses,
//! how they chain together, and the ratings attached to each link.
//!
//! Every operation here resolves the organization first and fails with 404
//! when the path does not match, so nested rows are never reachable through
//! the wrong organization.

pub mod departments;
pub mod it_assets;
pub mod it_services;
pub mod macroprocesses;
pub mod processes;
pub mod security_threats;
pub mod service_assets;
pub mod vulnerabilities;
