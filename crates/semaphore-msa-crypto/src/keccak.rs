use semaphore_msa_types::{Address, H256, U256, APPROVE_MESSAGE};
use sha3::{Digest, Keccak256};
use std::sync::OnceLock;

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Binds a call intent to the account's position in its history:
/// `keccak256(abi.encodePacked(uint256 seq, address target, uint256 value, bytes callData))`.
pub fn tx_hash(seq: u64, target: Address, value: U256, call_data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();

    let mut word = [0u8; 32];
    U256::from(seq).to_big_endian(&mut word);
    hasher.update(word);

    hasher.update(target.as_bytes());

    value.to_big_endian(&mut word);
    hasher.update(word);

    hasher.update(call_data);

    H256::from(<[u8; 32]>::from(hasher.finalize()))
}

/// Maps arbitrary bytes into the snark scalar field (`keccak256(data) >> 8`).
pub fn hash_to_field(data: &[u8]) -> U256 {
    U256::from_big_endian(&keccak256(data)) >> 8usize
}

static APPROVE: OnceLock<U256> = OnceLock::new();

/// Field element every approval proof must carry as its message.
pub fn approve_message() -> U256 {
    *APPROVE.get_or_init(|| hash_to_field(APPROVE_MESSAGE.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use semaphore_msa_types::SNARK_SCALAR_FIELD;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_tx_hash_matches_packed_encoding() {
        let target = Address::repeat_byte(0x42);
        let value = U256::from(1_000u64);
        let data = [0xde, 0xad];

        let mut packed = Vec::new();
        let mut word = [0u8; 32];
        U256::from(7u64).to_big_endian(&mut word);
        packed.extend_from_slice(&word);
        packed.extend_from_slice(target.as_bytes());
        value.to_big_endian(&mut word);
        packed.extend_from_slice(&word);
        packed.extend_from_slice(&data);
        assert_eq!(packed.len(), 32 + 20 + 32 + 2);

        assert_eq!(tx_hash(7, target, value, &data), H256::from(keccak256(&packed)));
    }

    #[test]
    fn test_approve_message_in_field() {
        let msg = approve_message();
        assert!(msg < SNARK_SCALAR_FIELD);
        assert_eq!(msg, hash_to_field(b"approve"));
    }

    proptest! {
        #[test]
        fn prop_sequence_separates_hashes(seq in 0u64..u64::MAX, value in any::<u64>(), data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let target = Address::repeat_byte(0x01);
            let a = tx_hash(seq, target, U256::from(value), &data);
            let b = tx_hash(seq + 1, target, U256::from(value), &data);
            prop_assert_ne!(a, b);
        }
    }
}
