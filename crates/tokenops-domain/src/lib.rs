mod account_role;
mod amount;
mod call_arg;
mod chain_id;
mod transaction_status;

pub use account_role::{AccountRole, UnknownAccountRole};
pub use amount::{AmountError, format_amount, parse_amount, parse_token_amount};
pub use call_arg::{CallArg, TokenAmount};
pub use chain_id::ChainId;
pub use transaction_status::{SENTINEL_TRANSACTION_HASH, TransactionStatus, UnknownTransactionStatus};
