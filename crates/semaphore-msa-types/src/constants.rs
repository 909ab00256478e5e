use ethers::types::U256;

pub const MODULE_NAME: &str = "SemaphoreMSAExecutor";

pub const MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// ERC-7579 module type id of an executor.
pub const MODULE_TYPE_EXECUTOR: u64 = 2;

/// Upper bound on members per account. The member counter is a `u8`.
pub const DEFAULT_MAX_MEMBERS: u8 = 32;

pub const MIN_MERKLE_TREE_DEPTH: u32 = 1;

pub const MAX_MERKLE_TREE_DEPTH: u32 = 32;

pub const DEFAULT_ROOT_VALIDITY_SECS: u64 = 3_600;

/// Message every approval proof must commit to.
pub const APPROVE_MESSAGE: &str = "approve";

pub const COMMITMENT_SIZE: usize = 32;

pub const PROOF_POINTS: usize = 8;

/// BN254 scalar field modulus, little-endian limbs.
pub const SNARK_SCALAR_FIELD: U256 = U256([
    0x43e1_f593_f000_0001,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_field_matches_decimal() {
        let expected = U256::from_dec_str(
            "21888242871839275222246405745257275088548364400416034343698204186575808495617",
        )
        .unwrap();
        assert_eq!(SNARK_SCALAR_FIELD, expected);
    }
}
