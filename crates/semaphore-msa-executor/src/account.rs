use crate::ledger::TransactionLedger;
use crate::nullifier::NullifierTracker;
use crate::roster::MemberRoster;
use crate::sequence::SequenceCounter;
use semaphore_msa_types::{AccountSnapshot, Address, GroupId};

/// Module state of one installed account.
#[derive(Clone, Debug)]
pub struct AccountState {
    pub threshold: u8,
    pub group_id: GroupId,
    pub roster: MemberRoster,
    pub sequence: SequenceCounter,
    pub ledger: TransactionLedger,
}

impl AccountState {
    pub fn new(account: Address, threshold: u8, group_id: GroupId, roster: MemberRoster) -> Self {
        Self {
            threshold,
            group_id,
            roster,
            sequence: SequenceCounter::new(),
            ledger: TransactionLedger::new(account),
        }
    }
}

/// Everything kept for an account, guarded by the account's lock.
///
/// Nullifier records outlive an uninstall so proofs gathered under an
/// earlier installation cannot be replayed after the sequence restarts.
#[derive(Debug, Default)]
pub struct AccountSlot {
    pub state: Option<AccountState>,
    pub nullifiers: NullifierTracker,
}

impl AccountSlot {
    pub fn snapshot(&self, account: Address) -> AccountSnapshot {
        let nullifiers = self.nullifiers.sorted();
        match &self.state {
            Some(state) => AccountSnapshot {
                account,
                installed: true,
                threshold: state.threshold,
                group_id: Some(state.group_id),
                sequence_number: state.sequence.current(),
                members: state.roster.list(),
                pending: state.ledger.list(),
                nullifiers,
            },
            None => AccountSnapshot {
                account,
                installed: false,
                threshold: 0,
                group_id: None,
                sequence_number: 0,
                members: Vec::new(),
                pending: Vec::new(),
                nullifiers,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semaphore_msa_types::{Commitment, U256};

    #[test]
    fn test_snapshot_of_empty_slot() {
        let snapshot = AccountSlot::default().snapshot(Address::repeat_byte(1));
        assert!(!snapshot.installed);
        assert_eq!(snapshot.member_count(), 0);
        assert!(snapshot.group_id.is_none());
    }

    #[test]
    fn test_snapshot_of_installed_slot() {
        let account = Address::repeat_byte(1);
        let mut roster = MemberRoster::new(account, 4);
        roster.add(&[Commitment::from_u64(10), Commitment::from_u64(11)]).unwrap();
        let slot = AccountSlot {
            state: Some(AccountState::new(account, 2, U256::from(5u64), roster)),
            nullifiers: NullifierTracker::new(),
        };

        let snapshot = slot.snapshot(account);
        assert!(snapshot.installed);
        assert_eq!(snapshot.threshold, 2);
        assert_eq!(snapshot.group_id, Some(U256::from(5u64)));
        assert_eq!(snapshot.members, vec![Commitment::from_u64(11), Commitment::from_u64(10)]);
    }
}
