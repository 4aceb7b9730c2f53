use alloy::sol;

sol! {
    /// ERC20 `Transfer`, the only event scanned for balance holders.
    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 value);
}
