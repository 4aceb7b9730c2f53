use futures::future::join_all;
use serde::Serialize;
use tokenops_blockchain::{DynSolValue, U256};
use tokenops_repository::{DeploymentRecord, DeploymentRepository};

use super::{OrchestratorError, ResolvedToken, TokenResolver, read::call_view};

/// Live token state read from chain for a deployment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenDetails {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    pub paused: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeploymentWithDetails {
    #[serde(flatten)]
    pub deployment: DeploymentRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_details: Option<TokenDetails>,
}

pub(crate) struct DeploymentCatalog {
    deployments: DeploymentRepository,
    resolver: TokenResolver,
}

impl DeploymentCatalog {
    pub(crate) fn new(deployments: DeploymentRepository, resolver: TokenResolver) -> Self {
        Self {
            deployments,
            resolver,
        }
    }

    pub(crate) async fn list(&self) -> Result<Vec<DeploymentRecord>, OrchestratorError> {
        Ok(self.deployments.list_all().await?)
    }

    pub(crate) async fn get(&self, id: &str) -> Result<DeploymentRecord, OrchestratorError> {
        self.deployments
            .find_by_id(id)
            .await?
            .ok_or_else(OrchestratorError::deployment_not_found)
    }

    pub(crate) async fn by_address(
        &self,
        contract_address: &str,
    ) -> Result<DeploymentRecord, OrchestratorError> {
        self.resolver
            .find_deployment(contract_address)
            .await?
            .ok_or_else(OrchestratorError::deployment_not_found)
    }

    /// Every deployment, enriched from each chain's default endpoint. A
    /// deployment whose details cannot be read is returned bare.
    pub(crate) async fn with_details(
        &self,
    ) -> Result<Vec<DeploymentWithDetails>, OrchestratorError> {
        let deployments = self.deployments.list_all().await?;
        Ok(join_all(deployments.into_iter().map(|deployment| async move {
            let token_details = match self.token_details(deployment.clone()).await {
                Ok(details) => Some(details),
                Err(error) => {
                    tracing::warn!(
                        contract_address = %deployment.contract_address,
                        chain_id = %deployment.chain_id,
                        error = %error,
                        "Failed to fetch token details"
                    );
                    None
                }
            };
            DeploymentWithDetails {
                deployment,
                token_details,
            }
        }))
        .await)
    }

    async fn token_details(
        &self,
        deployment: DeploymentRecord,
    ) -> Result<TokenDetails, OrchestratorError> {
        let token = self.resolver.resolve_deployment(deployment).await?;
        let reader = self.resolver.reader(token.chain_id(), None)?;
        let reader = reader.as_ref();
        let view = |function: &'static str| {
            call_view(reader, &token.abi, token.address, function, Vec::new())
        };

        let (name, symbol, decimals, total_supply, paused) = tokio::try_join!(
            view("name"),
            view("symbol"),
            view("decimals"),
            view("totalSupply"),
            view("paused"),
        )?;

        Ok(TokenDetails {
            name: expect_string(&token, name, "name")?,
            symbol: expect_string(&token, symbol, "symbol")?,
            decimals: expect_uint(&token, decimals, "decimals")?
                .try_into()
                .map_err(|_| unexpected(&token, "decimals"))?,
            total_supply: expect_uint(&token, total_supply, "totalSupply")?.to_string(),
            paused: match paused.as_slice() {
                [DynSolValue::Bool(flag)] => *flag,
                _ => return Err(unexpected(&token, "paused")),
            },
        })
    }
}

fn expect_string(
    token: &ResolvedToken,
    outputs: Vec<DynSolValue>,
    function: &str,
) -> Result<String, OrchestratorError> {
    match outputs.as_slice() {
        [DynSolValue::String(value)] => Ok(value.clone()),
        _ => Err(unexpected(token, function)),
    }
}

fn expect_uint(
    token: &ResolvedToken,
    outputs: Vec<DynSolValue>,
    function: &str,
) -> Result<U256, OrchestratorError> {
    match outputs.as_slice() {
        [DynSolValue::Uint(value, _)] => Ok(*value),
        _ => Err(unexpected(token, function)),
    }
}

fn unexpected(token: &ResolvedToken, function: &str) -> OrchestratorError {
    OrchestratorError::ReadFailed(format!(
        "{} on {} returned an unexpected value",
        function, token.address
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokenops_domain::ChainId;

    use super::*;
    use crate::application::test_support::{Harness, TOKEN_ADDRESS, address, deploy_fixture};

    fn catalog(harness: &Harness) -> DeploymentCatalog {
        DeploymentCatalog::new(harness.repository.deployment_repository(), harness.resolver())
    }

    fn stub_details(harness: &Harness) {
        let token = address(TOKEN_ADDRESS);
        let chain = &harness.chain;
        chain.stub_read(token, "name", vec![], vec![DynSolValue::String("MyToken".into())]);
        chain.stub_read(token, "symbol", vec![], vec![DynSolValue::String("MTK".into())]);
        chain.stub_read(
            token,
            "decimals",
            vec![],
            vec![DynSolValue::Uint(U256::from(18u8), 8)],
        );
        chain.stub_read(
            token,
            "totalSupply",
            vec![],
            vec![DynSolValue::Uint(U256::from(10u64).pow(U256::from(24u64)), 256)],
        );
        chain.stub_read(token, "paused", vec![], vec![DynSolValue::Bool(false)]);
    }

    #[tokio::test]
    async fn lookups_by_id_and_any_case_address() {
        let harness = Harness::new().await;
        let deployment = deploy_fixture(&harness).await;
        let catalog = catalog(&harness);

        assert_eq!(
            catalog.get(&deployment.id).await.expect("by id").id,
            deployment.id
        );
        assert_eq!(
            catalog
                .by_address(&TOKEN_ADDRESS.to_lowercase())
                .await
                .expect("by address")
                .id,
            deployment.id
        );
        assert!(matches!(
            catalog.get("missing").await,
            Err(OrchestratorError::NotFound(message)) if message == "Deployment not found"
        ));
    }

    #[tokio::test]
    async fn details_are_attached_when_readable() {
        let harness = Harness::new().await;
        let deployment = deploy_fixture(&harness).await;
        stub_details(&harness);
        let unsupported = harness.insert_deployment(ChainId::new(137)).await;

        let listed = catalog(&harness).with_details().await.expect("lists");
        assert_eq!(listed.len(), 2);

        let enriched = listed
            .iter()
            .find(|d| d.deployment.id == deployment.id)
            .expect("fixture listed");
        assert_eq!(
            enriched.token_details,
            Some(TokenDetails {
                name: "MyToken".to_string(),
                symbol: "MTK".to_string(),
                decimals: 18,
                total_supply: "1000000000000000000000000".to_string(),
                paused: false,
            })
        );
        // Enrichment uses the chain's default endpoint.
        assert!(harness.chain.rpc_urls().iter().all(Option::is_none));

        let bare = listed
            .iter()
            .find(|d| d.deployment.id == unsupported.id)
            .expect("unsupported listed");
        assert_eq!(bare.token_details, None);
        let json = serde_json::to_value(bare).expect("serializes");
        assert!(json.get("tokenDetails").is_none());
        assert_eq!(json["contractAddress"], json!(unsupported.contract_address));
    }

    #[tokio::test]
    async fn read_failure_returns_bare_deployment() {
        let harness = Harness::new().await;
        deploy_fixture(&harness).await;

        let listed = catalog(&harness).with_details().await.expect("lists");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].token_details, None);
    }
}
