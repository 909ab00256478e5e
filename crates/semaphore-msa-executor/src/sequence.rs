use semaphore_msa_types::{Address, MsaError, MsaResult};

/// Monotonic per-account counter bound into every transaction hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceCounter {
    value: u64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value the next initiated transaction will be hashed with.
    pub fn current(&self) -> u64 {
        self.value
    }

    pub fn advance(&mut self, account: Address) -> MsaResult<u64> {
        self.value = self
            .value
            .checked_add(1)
            .ok_or(MsaError::SequenceOverflow { account })?;
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut seq = SequenceCounter::new();
        assert_eq!(seq.current(), 0);
        assert_eq!(seq.advance(Address::zero()).unwrap(), 1);
        assert_eq!(seq.current(), 1);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut seq = SequenceCounter { value: u64::MAX };
        assert_eq!(
            seq.advance(Address::zero()),
            Err(MsaError::SequenceOverflow { account: Address::zero() })
        );
        assert_eq!(seq.current(), u64::MAX);
    }
}
