pub(crate) mod deployment;
pub(crate) mod token_contract;
pub(crate) mod token_transaction;
