use crate::keccak::keccak256;
use std::sync::OnceLock;

pub type Selector = [u8; 4];

pub const INITIATE_TX_SIGNATURE: &str =
    "initiateTx(address,uint256,bytes,(uint256,uint256,uint256,uint256,uint256,uint256[8]),bool)";

pub const SIGN_TX_SIGNATURE: &str =
    "signTx(bytes32,(uint256,uint256,uint256,uint256,uint256,uint256[8]),bool)";

pub const EXECUTE_TX_SIGNATURE: &str = "executeTx(bytes32)";

/// ERC-7579 account entry point wrapping every module call.
pub const ACCOUNT_EXECUTE_SIGNATURE: &str = "execute(bytes32,bytes)";

pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

static INITIATE_TX: OnceLock<Selector> = OnceLock::new();
static SIGN_TX: OnceLock<Selector> = OnceLock::new();
static EXECUTE_TX: OnceLock<Selector> = OnceLock::new();
static ACCOUNT_EXECUTE: OnceLock<Selector> = OnceLock::new();

pub fn initiate_tx_selector() -> Selector {
    *INITIATE_TX.get_or_init(|| selector(INITIATE_TX_SIGNATURE))
}

pub fn sign_tx_selector() -> Selector {
    *SIGN_TX.get_or_init(|| selector(SIGN_TX_SIGNATURE))
}

pub fn execute_tx_selector() -> Selector {
    *EXECUTE_TX.get_or_init(|| selector(EXECUTE_TX_SIGNATURE))
}

pub fn account_execute_selector() -> Selector {
    *ACCOUNT_EXECUTE.get_or_init(|| selector(ACCOUNT_EXECUTE_SIGNATURE))
}

pub fn selector_of(call_data: &[u8]) -> Option<Selector> {
    call_data.get(..4).map(|s| [s[0], s[1], s[2], s[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selector() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
    }

    #[test]
    fn test_gated_selectors_distinct() {
        let all = [
            initiate_tx_selector(),
            sign_tx_selector(),
            execute_tx_selector(),
            account_execute_selector(),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_selector_of_short_input() {
        assert_eq!(selector_of(&[1, 2, 3]), None);
        assert_eq!(selector_of(&[1, 2, 3, 4, 5]), Some([1, 2, 3, 4]));
    }
}
