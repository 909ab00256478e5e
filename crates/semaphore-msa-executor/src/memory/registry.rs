use crate::collaborators::{Clock, GroupRegistry, MerkleRoot};
use async_trait::async_trait;
use parking_lot::RwLock as SyncRwLock;
use semaphore_msa_crypto::hash_to_field;
use semaphore_msa_types::{Address, Commitment, GroupId, MsaError, MsaResult, MAX_MERKLE_TREE_DEPTH, U256};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const MAX_ROOT_HISTORY: usize = 256;

#[derive(Debug)]
struct RootEntry {
    members: HashSet<Commitment>,
    holders: usize,
}

/// Member set behind every root some group still accepts. Shared with the
/// dev verifier, which has no async context to query the registry from.
#[derive(Clone, Debug, Default)]
pub struct RootMembership {
    roots: Arc<SyncRwLock<HashMap<U256, RootEntry>>>,
}

impl RootMembership {
    pub fn contains(&self, root: U256, commitment: &Commitment) -> bool {
        self.roots
            .read()
            .get(&root)
            .is_some_and(|entry| entry.members.contains(commitment))
    }

    pub fn len(&self) -> usize {
        self.roots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.read().is_empty()
    }

    pub(crate) fn hold(&self, root: U256, members: &[Commitment]) {
        let mut roots = self.roots.write();
        roots
            .entry(root)
            .or_insert_with(|| RootEntry {
                members: members.iter().copied().collect(),
                holders: 0,
            })
            .holders += 1;
    }

    pub(crate) fn release(&self, root: U256) {
        let mut roots = self.roots.write();
        let drained = match roots.get_mut(&root) {
            Some(entry) => {
                entry.holders = entry.holders.saturating_sub(1);
                entry.holders == 0
            }
            None => false,
        };
        if drained {
            roots.remove(&root);
        }
    }
}

#[derive(Debug)]
struct GroupState {
    admin: Address,
    members: Vec<Commitment>,
    root: U256,
    root_history: HashMap<U256, u64>,
}

impl GroupState {
    /// Current root plus history; the empty-group root is never held.
    fn held_roots(&self) -> HashSet<U256> {
        let mut held: HashSet<U256> = self.root_history.keys().copied().collect();
        if !self.root.is_zero() {
            held.insert(self.root);
        }
        held
    }

    fn refresh_root(&mut self, now: u64, membership: &RootMembership) {
        let before = self.held_roots();
        if !self.root.is_zero() {
            self.root_history.insert(self.root, now);
            if self.root_history.len() > MAX_ROOT_HISTORY {
                if let Some(oldest) = self
                    .root_history
                    .iter()
                    .min_by_key(|(_, created)| **created)
                    .map(|(root, _)| *root)
                {
                    self.root_history.remove(&oldest);
                }
            }
        }
        self.root = members_root(&self.members);

        let after = self.held_roots();
        for root in after.difference(&before) {
            membership.hold(*root, &self.members);
        }
        for root in before.difference(&after) {
            membership.release(*root);
        }
    }
}

/// Stand-in for a Merkle tree root: a field-sized digest over the ordered
/// member list. Zero for an empty group.
pub fn members_root(members: &[Commitment]) -> U256 {
    if members.is_empty() {
        return U256::zero();
    }
    let mut data = Vec::with_capacity(members.len() * 32);
    for member in members {
        data.extend_from_slice(&member.to_bytes());
    }
    hash_to_field(&data)
}

pub fn tree_depth(size: usize) -> u32 {
    let mut depth = 1;
    while depth < MAX_MERKLE_TREE_DEPTH && (1usize << depth) < size {
        depth += 1;
    }
    depth
}

/// In-process group registry. Keeps a bounded history of superseded roots,
/// stamped with the time they were replaced.
pub struct InMemoryGroupRegistry {
    groups: Arc<RwLock<HashMap<GroupId, GroupState>>>,
    next_id: AtomicU64,
    validity_secs: u64,
    clock: Arc<dyn Clock>,
    membership: RootMembership,
}

impl InMemoryGroupRegistry {
    pub fn new(clock: Arc<dyn Clock>, validity_secs: u64) -> Self {
        Self {
            groups: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            validity_secs,
            clock,
            membership: RootMembership::default(),
        }
    }

    /// Handle on the root index, for verifiers built over this registry.
    pub fn membership(&self) -> RootMembership {
        self.membership.clone()
    }

    pub async fn members(&self, group_id: GroupId) -> Option<Vec<Commitment>> {
        self.groups.read().await.get(&group_id).map(|g| g.members.clone())
    }

    pub async fn admin(&self, group_id: GroupId) -> Option<Address> {
        self.groups.read().await.get(&group_id).map(|g| g.admin)
    }

    pub async fn group_count(&self) -> usize {
        self.groups.read().await.len()
    }
}

#[async_trait]
impl GroupRegistry for InMemoryGroupRegistry {
    async fn create_group(&self, admin: Address) -> MsaResult<GroupId> {
        let group_id = U256::from(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.groups.write().await.insert(
            group_id,
            GroupState {
                admin,
                members: Vec::new(),
                root: U256::zero(),
                root_history: HashMap::new(),
            },
        );
        debug!("Created group {} for admin {:?}", group_id, admin);
        Ok(group_id)
    }

    async fn add_members(&self, group_id: GroupId, commitments: &[Commitment]) -> MsaResult<()> {
        let now = self.clock.now();
        let mut groups = self.groups.write().await;
        let group = groups
            .get_mut(&group_id)
            .ok_or(MsaError::GroupDoesNotExist { group_id })?;

        if let Some(existing) = commitments.iter().find(|c| group.members.contains(c)) {
            return Err(MsaError::GroupRegistry(format!(
                "commitment {} already in group {}",
                existing, group_id
            )));
        }

        group.members.extend_from_slice(commitments);
        group.refresh_root(now, &self.membership);
        Ok(())
    }

    async fn remove_member(&self, group_id: GroupId, commitment: Commitment) -> MsaResult<()> {
        let now = self.clock.now();
        let mut groups = self.groups.write().await;
        let group = groups
            .get_mut(&group_id)
            .ok_or(MsaError::GroupDoesNotExist { group_id })?;

        let index = group
            .members
            .iter()
            .position(|c| *c == commitment)
            .ok_or_else(|| {
                MsaError::GroupRegistry(format!("commitment {} not in group {}", commitment, group_id))
            })?;
        group.members.remove(index);
        group.refresh_root(now, &self.membership);
        Ok(())
    }

    async fn delete_group(&self, group_id: GroupId) -> MsaResult<()> {
        let group = self
            .groups
            .write()
            .await
            .remove(&group_id)
            .ok_or(MsaError::GroupDoesNotExist { group_id })?;
        for root in group.held_roots() {
            self.membership.release(root);
        }
        debug!("Deleted group {}", group_id);
        Ok(())
    }

    async fn current_root(&self, group_id: GroupId) -> Option<MerkleRoot> {
        self.groups.read().await.get(&group_id).map(|g| MerkleRoot {
            root: g.root,
            depth: tree_depth(g.members.len()),
        })
    }

    async fn root_created_at(&self, group_id: GroupId, root: U256) -> Option<u64> {
        self.groups
            .read()
            .await
            .get(&group_id)
            .and_then(|g| g.root_history.get(&root).copied())
    }

    async fn root_validity_duration(&self, _group_id: GroupId) -> u64 {
        self.validity_secs
    }
}
