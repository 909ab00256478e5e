use semaphore_msa_types::{Address, MsaError, MsaResult, PendingTransaction, H256};
use std::collections::HashMap;

/// Pending transactions of one account, keyed by transaction hash.
///
/// Entries only move forward: they are created with one approval, gain
/// approvals, and are removed when executed.
#[derive(Clone, Debug)]
pub struct TransactionLedger {
    account: Address,
    entries: HashMap<H256, PendingTransaction>,
}

impl TransactionLedger {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, tx_hash: &H256) -> bool {
        self.entries.contains_key(tx_hash)
    }

    pub fn get(&self, tx_hash: &H256) -> MsaResult<&PendingTransaction> {
        self.entries.get(tx_hash).ok_or(MsaError::TxNotFound {
            account: self.account,
            tx_hash: *tx_hash,
        })
    }

    pub fn check_new(&self, tx_hash: &H256) -> MsaResult<()> {
        if self.contains(tx_hash) {
            return Err(MsaError::TxHasBeenInitiated {
                account: self.account,
                tx_hash: *tx_hash,
            });
        }
        Ok(())
    }

    pub fn insert(&mut self, tx: PendingTransaction) -> MsaResult<()> {
        self.check_new(&tx.tx_hash)?;
        self.entries.insert(tx.tx_hash, tx);
        Ok(())
    }

    /// Adds one approval. Returns the new count.
    ///
    /// An entry never carries more approvals than the roster has members.
    pub fn approve(&mut self, tx_hash: &H256, member_count: u8) -> MsaResult<u8> {
        let account = self.account;
        let entry = self.entries.get_mut(tx_hash).ok_or(MsaError::TxNotFound {
            account,
            tx_hash: *tx_hash,
        })?;
        let full = MsaError::ApprovalCountExceedsMembers {
            account,
            tx_hash: *tx_hash,
            member_count,
        };
        if entry.approval_count >= member_count {
            return Err(full);
        }
        entry.approval_count = entry.approval_count.checked_add(1).ok_or(full)?;
        Ok(entry.approval_count)
    }

    /// Fails if some entry carries more approvals than `member_count`.
    pub fn check_member_count(&self, member_count: u8) -> MsaResult<()> {
        match self.entries.values().find(|tx| tx.approval_count > member_count) {
            Some(tx) => Err(MsaError::ApprovalCountExceedsMembers {
                account: self.account,
                tx_hash: tx.tx_hash,
                member_count,
            }),
            None => Ok(()),
        }
    }

    pub fn remove(&mut self, tx_hash: &H256) -> MsaResult<PendingTransaction> {
        self.entries.remove(tx_hash).ok_or(MsaError::TxNotFound {
            account: self.account,
            tx_hash: *tx_hash,
        })
    }

    /// Ordered by creation sequence.
    pub fn list(&self) -> Vec<PendingTransaction> {
        let mut out: Vec<_> = self.entries.values().cloned().collect();
        out.sort_by_key(|tx| tx.created_at_seq);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semaphore_msa_types::{Bytes, U256};

    fn pending(byte: u8, seq: u64) -> PendingTransaction {
        PendingTransaction {
            tx_hash: H256::repeat_byte(byte),
            target: Address::repeat_byte(0x22),
            value: U256::from(1u64),
            call_data: Bytes::default(),
            approval_count: 1,
            created_at_seq: seq,
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut ledger = TransactionLedger::new(Address::repeat_byte(0x11));
        let tx = pending(1, 0);
        ledger.insert(tx.clone()).unwrap();
        assert!(matches!(
            ledger.insert(tx.clone()),
            Err(MsaError::TxHasBeenInitiated { .. })
        ));

        assert_eq!(ledger.approve(&tx.tx_hash, 3).unwrap(), 2);
        assert_eq!(ledger.get(&tx.tx_hash).unwrap().approval_count, 2);

        let removed = ledger.remove(&tx.tx_hash).unwrap();
        assert_eq!(removed.approval_count, 2);
        assert!(ledger.is_empty());
        assert!(matches!(ledger.get(&tx.tx_hash), Err(MsaError::TxNotFound { .. })));
    }

    #[test]
    fn test_approvals_capped_by_member_count() {
        let mut ledger = TransactionLedger::new(Address::repeat_byte(0x11));
        let tx = pending(1, 0);
        ledger.insert(tx.clone()).unwrap();

        assert_eq!(ledger.approve(&tx.tx_hash, 2).unwrap(), 2);
        assert_eq!(
            ledger.approve(&tx.tx_hash, 2),
            Err(MsaError::ApprovalCountExceedsMembers {
                account: Address::repeat_byte(0x11),
                tx_hash: tx.tx_hash,
                member_count: 2,
            })
        );
        assert_eq!(ledger.get(&tx.tx_hash).unwrap().approval_count, 2);

        assert!(ledger.check_member_count(2).is_ok());
        assert!(ledger.check_member_count(1).is_err());

        let mut full = pending(2, 1);
        full.approval_count = u8::MAX;
        ledger.insert(full.clone()).unwrap();
        assert!(ledger.approve(&full.tx_hash, u8::MAX).is_err());
        assert_eq!(ledger.get(&full.tx_hash).unwrap().approval_count, u8::MAX);
    }

    #[test]
    fn test_list_ordered_by_sequence() {
        let mut ledger = TransactionLedger::new(Address::repeat_byte(0x11));
        ledger.insert(pending(9, 2)).unwrap();
        ledger.insert(pending(3, 0)).unwrap();
        ledger.insert(pending(5, 1)).unwrap();

        let seqs: Vec<u64> = ledger.list().iter().map(|tx| tx.created_at_seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }
}
