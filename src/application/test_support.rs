//! In-memory chain and store used by the application tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU8, Ordering},
    },
};

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tokenops_blockchain::{
    AccountRegistry, Address, B256, BlockchainError, Bytes, ChainConfig, ChainConfigRaw,
    ChainConnector, ChainReader, ChainWriter, ContractAbi, ContractCall, DynSolValue,
    PrivateKeySigner, ReceiptSummary, SimulationFailure, TransferLog,
};
use tokenops_domain::{AccountRole, ChainId, TransactionStatus};
use tokenops_repository::{
    DeploymentRecord, NewDeployment, NewTokenContract, RepositoryManager, TokenContractRecord,
};
use tokio::sync::Notify;

use super::{OrchestratorConfig, ReadExecutor, TokenResolver, WriteOrchestrator};

pub(crate) const ANVIL_CHAIN_ID: ChainId = ChainId::new(31_337);
pub(crate) const TOKEN_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub(crate) const DEPLOYER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub(crate) const HOLDER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub(crate) const OTHER_HOLDER: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

const ANVIL_KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ANVIL_KEY_1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub(crate) fn address(text: &str) -> Address {
    text.parse().expect("valid test address")
}

/// Allowlisted ERC20 used across the tests.
pub(crate) fn token_abi_json() -> Value {
    json!([
        {
            "type": "constructor", "stateMutability": "nonpayable",
            "inputs": [
                {"name": "name_", "type": "string"},
                {"name": "symbol_", "type": "string"},
                {"name": "decimals_", "type": "uint8"},
                {"name": "initialSupply", "type": "uint256"}
            ]
        },
        {"type": "function", "name": "name", "stateMutability": "view", "inputs": [], "outputs": [{"name": "", "type": "string"}]},
        {"type": "function", "name": "symbol", "stateMutability": "view", "inputs": [], "outputs": [{"name": "", "type": "string"}]},
        {"type": "function", "name": "decimals", "stateMutability": "view", "inputs": [], "outputs": [{"name": "", "type": "uint8"}]},
        {"type": "function", "name": "totalSupply", "stateMutability": "view", "inputs": [], "outputs": [{"name": "", "type": "uint256"}]},
        {"type": "function", "name": "paused", "stateMutability": "view", "inputs": [], "outputs": [{"name": "", "type": "bool"}]},
        {"type": "function", "name": "owner", "stateMutability": "view", "inputs": [], "outputs": [{"name": "", "type": "address"}]},
        {
            "type": "function", "name": "balanceOf", "stateMutability": "view",
            "inputs": [{"name": "account", "type": "address"}],
            "outputs": [{"name": "", "type": "uint256"}]
        },
        {
            "type": "function", "name": "isAllowlisted", "stateMutability": "view",
            "inputs": [{"name": "account", "type": "address"}],
            "outputs": [{"name": "", "type": "bool"}]
        },
        {
            "type": "function", "name": "mint", "stateMutability": "nonpayable",
            "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
            "outputs": []
        },
        {
            "type": "function", "name": "transfer", "stateMutability": "nonpayable",
            "inputs": [{"name": "to", "type": "address"}, {"name": "value", "type": "uint256"}],
            "outputs": [{"name": "", "type": "bool"}]
        },
        {"type": "function", "name": "pause", "stateMutability": "nonpayable", "inputs": [], "outputs": []},
        {
            "type": "event", "name": "Transfer", "anonymous": false,
            "inputs": [
                {"name": "from", "type": "address", "indexed": true},
                {"name": "to", "type": "address", "indexed": true},
                {"name": "value", "type": "uint256", "indexed": false}
            ]
        },
        {"type": "error", "name": "NotAllowlisted", "inputs": [{"name": "account", "type": "address"}]},
        {"type": "error", "name": "EnforcedPause", "inputs": []}
    ])
}

pub(crate) fn token_abi() -> ContractAbi {
    ContractAbi::from_value(token_abi_json()).expect("fixture ABI parses")
}

pub(crate) fn orchestrator_config() -> OrchestratorConfig {
    OrchestratorConfig {
        write_gas_limit: 1_000_000,
        deploy_gas_limit: 5_000_000,
        balance_holder_concurrency: 4,
        seed_templates: Vec::new(),
    }
}

fn anvil_config() -> ChainConfig {
    ChainConfigRaw {
        enabled: true,
        chain_id: ANVIL_CHAIN_ID,
        name: "Anvil".to_string(),
        default_rpc_url: "http://127.0.0.1:8545".to_string(),
        max_rpc_requests_per_second: None,
        tx_receipt_timeout_ms: 1_000,
        log_block_window: None,
    }
    .resolve()
    .expect("anvil config resolves")
}

#[derive(Default)]
struct MockChainState {
    simulation_failure: Option<SimulationFailure>,
    submit_error: Option<String>,
    receipt: Option<Result<ReceiptSummary, String>>,
    reads: HashMap<Bytes, Bytes>,
    failing_reads: Vec<Bytes>,
    transfer_logs: Vec<TransferLog>,
    block_number: u64,
    simulated: Vec<(ContractCall, Address)>,
    submitted: Vec<(ContractCall, Option<u64>)>,
    deployed: Vec<(Bytes, u64)>,
    rpc_urls: Vec<Option<String>>,
}

/// Scripted chain: one shared state behind every reader and writer it hands out.
#[derive(Clone)]
pub(crate) struct MockChain {
    config: ChainConfig,
    state: Arc<Mutex<MockChainState>>,
    receipt_gate: Arc<Notify>,
    hold_receipts: Arc<std::sync::atomic::AtomicBool>,
    next_hash: Arc<AtomicU8>,
}

impl MockChain {
    pub(crate) fn new() -> Self {
        Self {
            config: anvil_config(),
            state: Arc::new(Mutex::new(MockChainState::default())),
            receipt_gate: Arc::new(Notify::new()),
            hold_receipts: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            next_hash: Arc::new(AtomicU8::new(1)),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockChainState> {
        self.state.lock().expect("mock state lock")
    }

    pub(crate) fn reject_simulation(&self, failure: SimulationFailure) {
        self.state().simulation_failure = Some(failure);
    }

    pub(crate) fn fail_submission(&self, message: &str) {
        self.state().submit_error = Some(message.to_string());
    }

    pub(crate) fn set_receipt(&self, receipt: Result<ReceiptSummary, String>) {
        self.state().receipt = Some(receipt);
    }

    /// Receipt waits block until [`MockChain::release_receipts`] is called.
    pub(crate) fn hold_receipts(&self) {
        self.hold_receipts.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release_receipts(&self) {
        self.hold_receipts.store(false, Ordering::SeqCst);
        self.receipt_gate.notify_waiters();
        self.receipt_gate.notify_one();
    }

    /// Answers `function(args)` on `to` with the ABI-encoded `outputs`.
    pub(crate) fn stub_read(
        &self,
        to: Address,
        function: &str,
        args: Vec<DynSolValue>,
        outputs: Vec<DynSolValue>,
    ) {
        let call = token_abi()
            .encode_call(to, function, args)
            .expect("stub call encodes");
        let encoded = DynSolValue::Tuple(outputs).abi_encode_params();
        self.state().reads.insert(call.calldata, encoded.into());
    }

    pub(crate) fn fail_read(&self, to: Address, function: &str, args: Vec<DynSolValue>) {
        let call = token_abi()
            .encode_call(to, function, args)
            .expect("stub call encodes");
        self.state().failing_reads.push(call.calldata);
    }

    pub(crate) fn set_transfer_logs(&self, block_number: u64, logs: Vec<TransferLog>) {
        let mut state = self.state();
        state.block_number = block_number;
        state.transfer_logs = logs;
    }

    pub(crate) fn simulated(&self) -> Vec<(ContractCall, Address)> {
        self.state().simulated.clone()
    }

    pub(crate) fn submitted(&self) -> Vec<(ContractCall, Option<u64>)> {
        self.state().submitted.clone()
    }

    pub(crate) fn deployed(&self) -> Vec<(Bytes, u64)> {
        self.state().deployed.clone()
    }

    pub(crate) fn rpc_urls(&self) -> Vec<Option<String>> {
        self.state().rpc_urls.clone()
    }

    fn fresh_hash(&self) -> B256 {
        B256::repeat_byte(self.next_hash.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl ChainReader for MockChain {
    fn chain_id(&self) -> ChainId {
        ANVIL_CHAIN_ID
    }

    async fn simulate_call(
        &self,
        call: &ContractCall,
        from: Address,
    ) -> Result<Bytes, SimulationFailure> {
        let mut state = self.state();
        state.simulated.push((call.clone(), from));
        match state.simulation_failure.clone() {
            Some(failure) => Err(failure),
            None => Ok(Bytes::new()),
        }
    }

    async fn read_call(&self, call: &ContractCall) -> Result<Bytes, BlockchainError> {
        let state = self.state();
        if state.failing_reads.contains(&call.calldata) {
            return Err(BlockchainError::Call {
                reason: "connection reset".to_string(),
                source: None,
            });
        }
        state
            .reads
            .get(&call.calldata)
            .cloned()
            .ok_or_else(|| BlockchainError::Call {
                reason: format!("execution reverted: no stub for {}", call.function),
                source: None,
            })
    }

    async fn block_number(&self) -> Result<u64, BlockchainError> {
        Ok(self.state().block_number)
    }

    async fn transfer_logs(
        &self,
        token: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferLog>, BlockchainError> {
        assert_eq!(token, address(TOKEN_ADDRESS));
        Ok(self
            .state()
            .transfer_logs
            .iter()
            .filter(|log| {
                log.block_number
                    .is_none_or(|block| block >= from_block && block <= to_block)
            })
            .cloned()
            .collect())
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<ReceiptSummary, BlockchainError> {
        while self.hold_receipts.load(Ordering::SeqCst) {
            self.receipt_gate.notified().await;
        }
        let scripted = self.state().receipt.clone();
        match scripted {
            Some(Ok(receipt)) => Ok(ReceiptSummary {
                transaction_hash: hash,
                ..receipt
            }),
            Some(Err(reason)) => Err(BlockchainError::ReceiptFailed { reason }),
            None => Ok(success_receipt(hash, None)),
        }
    }
}

pub(crate) fn success_receipt(hash: B256, contract_address: Option<Address>) -> ReceiptSummary {
    ReceiptSummary {
        transaction_hash: hash,
        success: true,
        gas_used: 51_234,
        contract_address,
        block_number: Some(7),
    }
}

struct MockWriter {
    chain: MockChain,
    address: Address,
}

#[async_trait]
impl ChainWriter for MockWriter {
    fn address(&self) -> Address {
        self.address
    }

    async fn submit_call(
        &self,
        call: &ContractCall,
        gas_limit: Option<u64>,
    ) -> Result<B256, BlockchainError> {
        let error = {
            let mut state = self.chain.state();
            state.submitted.push((call.clone(), gas_limit));
            state.submit_error.clone()
        };
        match error {
            Some(reason) => Err(BlockchainError::Submission {
                reason,
                source: None,
            }),
            None => Ok(self.chain.fresh_hash()),
        }
    }

    async fn deploy_contract(&self, code: Bytes, gas_limit: u64) -> Result<B256, BlockchainError> {
        let error = {
            let mut state = self.chain.state();
            state.deployed.push((code, gas_limit));
            state.submit_error.clone()
        };
        match error {
            Some(reason) => Err(BlockchainError::Submission {
                reason,
                source: None,
            }),
            None => Ok(self.chain.fresh_hash()),
        }
    }
}

/// Serves [`MockChain`] for Anvil and rejects every other chain id.
pub(crate) struct MockConnector {
    chain: MockChain,
}

impl ChainConnector for MockConnector {
    fn chain(&self, chain_id: ChainId) -> Result<&ChainConfig, BlockchainError> {
        if chain_id == ANVIL_CHAIN_ID {
            Ok(&self.chain.config)
        } else {
            Err(BlockchainError::UnsupportedChain { chain_id })
        }
    }

    fn supported_chains(&self) -> Vec<ChainId> {
        vec![ANVIL_CHAIN_ID]
    }

    fn reader(
        &self,
        chain_id: ChainId,
        rpc_url: Option<&str>,
    ) -> Result<Arc<dyn ChainReader>, BlockchainError> {
        self.chain(chain_id)?;
        self.chain.state().rpc_urls.push(rpc_url.map(str::to_string));
        Ok(Arc::new(self.chain.clone()))
    }

    fn writer(
        &self,
        chain_id: ChainId,
        _rpc_url: Option<&str>,
        signer: PrivateKeySigner,
    ) -> Result<Arc<dyn ChainWriter>, BlockchainError> {
        self.chain(chain_id)?;
        Ok(Arc::new(MockWriter {
            chain: self.chain.clone(),
            address: signer.address(),
        }))
    }
}

/// SQLite-backed store plus a scripted chain, wired like production.
pub(crate) struct Harness {
    pub repository: Arc<RepositoryManager>,
    pub chain: MockChain,
    pub connector: Arc<dyn ChainConnector>,
    pub accounts: Arc<AccountRegistry>,
    next_address: AtomicU8,
}

impl Harness {
    pub(crate) async fn new() -> Self {
        // A single connection keeps every query on the same in-memory database.
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let conn = Database::connect(opt).await.expect("sqlite connects");
        let repository = RepositoryManager::from_connection(conn)
            .await
            .expect("migrations apply");

        let chain = MockChain::new();
        let signers = [
            (AccountRole::Deployer, ANVIL_KEY_0),
            (AccountRole::A1, ANVIL_KEY_1),
        ]
        .map(|(role, key)| (role, key.parse::<PrivateKeySigner>().expect("anvil key")));

        Self {
            repository: Arc::new(repository),
            connector: Arc::new(MockConnector {
                chain: chain.clone(),
            }),
            chain,
            accounts: Arc::new(AccountRegistry::from_signers(signers)),
            next_address: AtomicU8::new(0x10),
        }
    }

    pub(crate) fn resolver(&self) -> TokenResolver {
        TokenResolver::new(
            self.repository.deployment_repository(),
            self.repository.token_contract_repository(),
            Arc::clone(&self.connector),
        )
    }

    pub(crate) fn write_orchestrator(&self) -> WriteOrchestrator {
        WriteOrchestrator::new(
            self.resolver(),
            Arc::clone(&self.accounts),
            self.repository.transaction_repository(),
            &orchestrator_config(),
        )
    }

    pub(crate) fn read_executor(&self) -> ReadExecutor {
        ReadExecutor::new(self.resolver(), &orchestrator_config())
    }

    pub(crate) async fn insert_template(&self) -> TokenContractRecord {
        self.repository
            .token_contract_repository()
            .create(NewTokenContract {
                name: "MyToken".to_string(),
                symbol: "MTK".to_string(),
                decimals: 18,
                abi: token_abi_json(),
                bytecode: "0x6080604052".to_string(),
            })
            .await
            .expect("template created")
    }

    pub(crate) async fn insert_deployment_at(
        &self,
        chain_id: ChainId,
        contract_address: Address,
    ) -> DeploymentRecord {
        let template = self.insert_template().await;
        self.repository
            .deployment_repository()
            .create(NewDeployment {
                contract_address: contract_address.to_checksum(None),
                chain_id,
                deployer_address: DEPLOYER.to_string(),
                token_contract_id: template.id,
                decimals: 18,
                transaction_hash: format!("0x{}", "ab".repeat(32)),
                initial_supply: "1000000000000000000000000".to_string(),
                gas_used: Some("1234567".to_string()),
                status: TransactionStatus::Confirmed,
            })
            .await
            .expect("deployment created")
    }

    /// Deployment at a fresh address on `chain_id`.
    pub(crate) async fn insert_deployment(&self, chain_id: ChainId) -> DeploymentRecord {
        let byte = self.next_address.fetch_add(1, Ordering::SeqCst);
        self.insert_deployment_at(chain_id, Address::repeat_byte(byte))
            .await
    }
}

/// The MyToken deployment at [`TOKEN_ADDRESS`] on Anvil.
pub(crate) async fn deploy_fixture(harness: &Harness) -> DeploymentRecord {
    harness
        .insert_deployment_at(ANVIL_CHAIN_ID, address(TOKEN_ADDRESS))
        .await
}
