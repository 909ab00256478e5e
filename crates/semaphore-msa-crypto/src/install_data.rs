use semaphore_msa_types::{Commitment, MsaError, MsaResult, COMMITMENT_SIZE};

/// Executor install payload: `abi.encodePacked(uint8 threshold, uint256[] commitments)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallData {
    pub threshold: u8,
    pub commitments: Vec<Commitment>,
}

impl InstallData {
    pub fn new(threshold: u8, commitments: Vec<Commitment>) -> Self {
        Self { threshold, commitments }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.commitments.len() * COMMITMENT_SIZE);
        out.push(self.threshold);
        for commitment in &self.commitments {
            out.extend_from_slice(&commitment.to_bytes());
        }
        out
    }

    pub fn decode(data: &[u8]) -> MsaResult<Self> {
        let (threshold, rest) = data
            .split_first()
            .ok_or_else(|| MsaError::InvalidInstallData("empty payload".into()))?;

        if rest.is_empty() {
            return Err(MsaError::InvalidInstallData("no commitments".into()));
        }
        if rest.len() % COMMITMENT_SIZE != 0 {
            return Err(MsaError::InvalidInstallData(format!(
                "commitment section is {} bytes, not a multiple of {}",
                rest.len(),
                COMMITMENT_SIZE
            )));
        }

        let commitments = rest
            .chunks_exact(COMMITMENT_SIZE)
            .map(|chunk| {
                let mut word = [0u8; COMMITMENT_SIZE];
                word.copy_from_slice(chunk);
                Commitment::from_bytes(word)
            })
            .collect();

        Ok(Self {
            threshold: *threshold,
            commitments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let data = InstallData::new(2, vec![Commitment::from_u64(10), Commitment::from_u64(20)]);
        let encoded = data.encode();
        assert_eq!(encoded.len(), 1 + 64);
        assert_eq!(encoded[0], 2);
        assert_eq!(encoded[32], 10);
        assert_eq!(encoded[64], 20);
        assert_eq!(InstallData::decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(InstallData::decode(&[]).is_err());
        assert!(InstallData::decode(&[1]).is_err());
        assert!(InstallData::decode(&[1; 33 + 5]).is_err());
    }
}
