use serde::{Deserialize, Serialize};
use tokenops_repository::TableCounts;

#[derive(Deserialize, Debug)]
pub(crate) struct ConfirmationRequest {
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct TableStats {
    pub transactions: u64,
    pub deployments: u64,
    pub token_contracts: u64,
}

#[derive(Serialize, Debug)]
pub(crate) struct StatsResponse {
    pub tables: TableStats,
    pub total: u64,
}

impl From<TableCounts> for StatsResponse {
    fn from(counts: TableCounts) -> Self {
        Self {
            tables: TableStats {
                transactions: counts.transactions,
                deployments: counts.deployments,
                token_contracts: counts.token_contracts,
            },
            total: counts.total(),
        }
    }
}

/// Tables emptied by a wipe, children first.
pub(crate) const CLEARED_TABLES: [&str; 3] = ["transactions", "deployments", "token_contracts"];

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClearResponse {
    pub message: &'static str,
    pub cleared_tables: [&'static str; 3],
    pub deleted: StatsResponse,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetResponse {
    pub message: &'static str,
    pub deleted: StatsResponse,
    pub seeded_templates: usize,
}
