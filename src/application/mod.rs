//! Token operations: deployment, writes with simulation and confirmation,
//! reads, and store maintenance.

mod admin;
mod config;
mod deploy;
mod deployments;
mod error;
mod ledger;
mod monitor;
mod read;
mod resolution;
mod templates;
mod write;

#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use admin::DatabaseAdmin;
pub(crate) use config::{OrchestratorConfig, SeedTemplateConfig};
pub(crate) use deploy::{DeployRequest, DeployService};
pub(crate) use deployments::DeploymentCatalog;
pub(crate) use error::OrchestratorError;
pub(crate) use ledger::TransactionLedger;
pub(crate) use monitor::ConfirmationMonitor;
pub(crate) use read::{ReadExecutor, ReadRequest};
pub(crate) use resolution::{ResolvedToken, TokenResolver};
pub(crate) use templates::{TemplateRegistry, load_seed_templates};
pub(crate) use write::{WriteOrchestrator, WriteOutcome, WriteRequest};
