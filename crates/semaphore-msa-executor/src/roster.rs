use semaphore_msa_types::{Address, Commitment, MsaError, MsaResult};
use std::collections::{HashMap, HashSet};

/// Sentinel-anchored singly linked list of member commitments.
///
/// `next` maps each entry to its successor; `SENTINEL` is both head and tail
/// marker. Membership is a map lookup and removal is O(1) once the caller
/// supplies the predecessor of the removed entry.
#[derive(Clone, Debug)]
pub struct MemberRoster {
    account: Address,
    next: HashMap<Commitment, Commitment>,
    count: u8,
    cap: u8,
}

impl MemberRoster {
    pub fn new(account: Address, cap: u8) -> Self {
        let mut next = HashMap::with_capacity(cap as usize + 1);
        next.insert(Commitment::SENTINEL, Commitment::SENTINEL);
        Self {
            account,
            next,
            count: 0,
            cap,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn cap(&self) -> u8 {
        self.cap
    }

    pub fn contains(&self, commitment: &Commitment) -> bool {
        !commitment.is_sentinel() && self.next.contains_key(commitment)
    }

    /// Checks a batch without touching the roster.
    pub fn check_additions(&self, commitments: &[Commitment]) -> MsaResult<()> {
        let mut seen = HashSet::with_capacity(commitments.len());
        if !commitments.iter().all(|c| seen.insert(*c)) {
            return Err(MsaError::CommitmentsNotUnique);
        }

        for commitment in commitments {
            if commitment.is_zero() {
                return Err(MsaError::LeafCannotBeZero);
            }
            if commitment.is_sentinel() {
                return Err(MsaError::InvalidCommitment {
                    account: self.account,
                    commitment: *commitment,
                });
            }
            if !commitment.in_field() {
                return Err(MsaError::LeafGreaterThanSnarkScalarField {
                    commitment: *commitment,
                });
            }
        }

        if self.count as usize + commitments.len() > self.cap as usize {
            return Err(MsaError::MaxMemberReached { account: self.account });
        }

        if let Some(existing) = commitments.iter().find(|c| self.contains(c)) {
            return Err(MsaError::IsMemberAlready {
                account: self.account,
                commitment: *existing,
            });
        }

        Ok(())
    }

    pub fn add(&mut self, commitments: &[Commitment]) -> MsaResult<()> {
        self.check_additions(commitments)?;

        for commitment in commitments {
            let head = self.next[&Commitment::SENTINEL];
            self.next.insert(*commitment, head);
            self.next.insert(Commitment::SENTINEL, *commitment);
        }
        self.count += commitments.len() as u8;
        Ok(())
    }

    pub fn check_removal(&self, predecessor: &Commitment, commitment: &Commitment) -> MsaResult<()> {
        if !self.contains(commitment) {
            return Err(MsaError::MemberNotExists {
                account: self.account,
                commitment: *commitment,
            });
        }
        if self.next.get(predecessor) != Some(commitment) {
            return Err(MsaError::InvalidRemovalWitness {
                account: self.account,
                predecessor: *predecessor,
                commitment: *commitment,
            });
        }
        Ok(())
    }

    pub fn remove(&mut self, predecessor: &Commitment, commitment: &Commitment) -> MsaResult<()> {
        self.check_removal(predecessor, commitment)?;

        let successor = self.next.remove(commitment).unwrap_or(Commitment::SENTINEL);
        self.next.insert(*predecessor, successor);
        self.count -= 1;
        Ok(())
    }

    /// Entry pointing at `commitment`; the removal witness. Walks the list.
    pub fn predecessor_of(&self, commitment: &Commitment) -> Option<Commitment> {
        if !self.contains(commitment) {
            return None;
        }
        self.next
            .iter()
            .find(|(_, next)| *next == commitment)
            .map(|(prev, _)| *prev)
    }

    pub fn list(&self) -> Vec<Commitment> {
        let mut out = Vec::with_capacity(self.count as usize);
        let mut cursor = self.next[&Commitment::SENTINEL];
        while !cursor.is_sentinel() {
            out.push(cursor);
            cursor = self.next[&cursor];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semaphore_msa_types::{SNARK_SCALAR_FIELD, U256};

    fn c(v: u64) -> Commitment {
        Commitment::from_u64(v)
    }

    fn roster() -> MemberRoster {
        MemberRoster::new(Address::repeat_byte(0xaa), 4)
    }

    #[test]
    fn test_add_and_list() {
        let mut r = roster();
        r.add(&[c(10), c(20), c(30)]).unwrap();
        assert_eq!(r.count(), 3);
        assert!(r.contains(&c(20)));
        assert!(!r.contains(&Commitment::SENTINEL));

        let mut listed = r.list();
        listed.sort();
        assert_eq!(listed, vec![c(10), c(20), c(30)]);
    }

    #[test]
    fn test_add_rejections() {
        let mut r = roster();
        assert_eq!(r.add(&[c(5), c(5)]), Err(MsaError::CommitmentsNotUnique));
        assert_eq!(r.add(&[c(0)]), Err(MsaError::LeafCannotBeZero));
        assert!(matches!(r.add(&[c(1)]), Err(MsaError::InvalidCommitment { .. })));
        assert!(matches!(
            r.add(&[Commitment(SNARK_SCALAR_FIELD + U256::one())]),
            Err(MsaError::LeafGreaterThanSnarkScalarField { .. })
        ));

        r.add(&[c(7)]).unwrap();
        assert!(matches!(r.add(&[c(7)]), Err(MsaError::IsMemberAlready { .. })));
        assert_eq!(r.count(), 1);
    }

    #[test]
    fn test_cap_is_never_truncated() {
        let mut r = roster();
        r.add(&[c(2), c(3), c(4)]).unwrap();
        assert!(matches!(r.add(&[c(5), c(6)]), Err(MsaError::MaxMemberReached { .. })));
        assert_eq!(r.count(), 3);
        assert!(!r.contains(&c(5)));
        r.add(&[c(5)]).unwrap();
        assert_eq!(r.count(), 4);
    }

    #[test]
    fn test_remove_with_witness() {
        let mut r = roster();
        r.add(&[c(10), c(20), c(30)]).unwrap();

        let prev = r.predecessor_of(&c(20)).unwrap();
        r.remove(&prev, &c(20)).unwrap();
        assert_eq!(r.count(), 2);
        assert!(!r.contains(&c(20)));
        assert_eq!(r.list().len(), 2);

        let head = r.list()[0];
        r.remove(&Commitment::SENTINEL, &head).unwrap();
        assert_eq!(r.count(), 1);
    }

    #[test]
    fn test_remove_rejections() {
        let mut r = roster();
        r.add(&[c(10), c(20)]).unwrap();
        assert!(matches!(
            r.remove(&Commitment::SENTINEL, &c(99)),
            Err(MsaError::MemberNotExists { .. })
        ));

        // newest entries sit at the head: SENTINEL -> 20 -> 10
        assert_eq!(r.list(), vec![c(20), c(10)]);
        assert!(matches!(
            r.remove(&Commitment::SENTINEL, &c(10)),
            Err(MsaError::InvalidRemovalWitness { .. })
        ));
        assert!(matches!(
            r.remove(&c(10), &c(10)),
            Err(MsaError::InvalidRemovalWitness { .. })
        ));
        assert_eq!(r.count(), 2);
    }
}
