use crate::constants::{COMMITMENT_SIZE, SNARK_SCALAR_FIELD};
use crate::error::{MsaError, MsaResult};
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Public identity commitment of a member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(pub U256);

impl Commitment {
    /// Reserved roster boundary marker. Never a valid member.
    pub const SENTINEL: Commitment = Commitment(U256([1, 0, 0, 0]));

    pub const ZERO: Commitment = Commitment(U256([0, 0, 0, 0]));

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    pub fn from_bytes(bytes: [u8; COMMITMENT_SIZE]) -> Self {
        Self(U256::from_big_endian(&bytes))
    }

    pub fn to_bytes(&self) -> [u8; COMMITMENT_SIZE] {
        let mut out = [0u8; COMMITMENT_SIZE];
        self.0.to_big_endian(&mut out);
        out
    }

    pub fn value(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    pub fn in_field(&self) -> bool {
        self.0 < SNARK_SCALAR_FIELD
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Accepts `0x`-prefixed hex or a decimal string.
    pub fn parse(s: &str) -> MsaResult<Self> {
        let s = s.trim();
        if let Some(stripped) = s.strip_prefix("0x") {
            let bytes = hex::decode(stripped)
                .map_err(|e| MsaError::InvalidInstallData(format!("bad commitment hex: {}", e)))?;
            if bytes.len() > COMMITMENT_SIZE {
                return Err(MsaError::InvalidInstallData("commitment longer than 32 bytes".into()));
            }
            return Ok(Self(U256::from_big_endian(&bytes)));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|e| MsaError::InvalidInstallData(format!("bad commitment: {}", e)))
    }
}

impl From<U256> for Commitment {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<Commitment> for U256 {
    fn from(value: Commitment) -> Self {
        value.0
    }
}

impl FromStr for Commitment {
    type Err = MsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.0)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_and_zero() {
        assert!(Commitment::SENTINEL.is_sentinel());
        assert!(Commitment::ZERO.is_zero());
        assert_eq!(Commitment::from_u64(1), Commitment::SENTINEL);
        assert!(!Commitment::from_u64(2).is_sentinel());
    }

    #[test]
    fn test_parse_hex_and_decimal() {
        let dec: Commitment = "255".parse().unwrap();
        let hex: Commitment = "0xff".parse().unwrap();
        assert_eq!(dec, hex);
        assert!("0xzz".parse::<Commitment>().is_err());
        assert!("not-a-number".parse::<Commitment>().is_err());
    }

    #[test]
    fn test_bytes_are_big_endian() {
        let c = Commitment::from_u64(0x0102);
        let bytes = c.to_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert_eq!(Commitment::from_bytes(bytes), c);
    }

    #[test]
    fn test_field_bound() {
        assert!(Commitment::from_u64(42).in_field());
        assert!(!Commitment(SNARK_SCALAR_FIELD).in_field());
        assert!(!Commitment(U256::MAX).in_field());
    }
}
