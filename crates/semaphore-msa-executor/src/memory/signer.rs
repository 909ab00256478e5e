use crate::collaborators::{MemberPublicKey, MemberSignatureScheme};
use crate::gateway::{MemberCredential, MEMBER_SIGNATURE_SIZE};
use semaphore_msa_crypto::{constant_time_eq, hash_to_field, keccak256};
use semaphore_msa_types::{Bytes, Commitment, H256};

fn pk_bytes(public_key: &MemberPublicKey) -> [u8; 64] {
    let mut out = [0u8; 64];
    public_key[0].to_big_endian(&mut out[..32]);
    public_key[1].to_big_endian(&mut out[32..]);
    out
}

fn dev_signature(public_key: &MemberPublicKey, message: &H256) -> [u8; MEMBER_SIGNATURE_SIZE] {
    let mut out = [0u8; MEMBER_SIGNATURE_SIZE];
    for (i, chunk) in out.chunks_mut(32).enumerate() {
        let mut data = pk_bytes(public_key).to_vec();
        data.extend_from_slice(message.as_bytes());
        data.push(i as u8);
        chunk.copy_from_slice(&keccak256(&data));
    }
    out
}

/// Dev signing scheme: signatures are a keyed digest of the public key and
/// message. Anyone holding the public key can forge one.
#[derive(Clone, Copy, Debug, Default)]
pub struct DevSignatureScheme;

impl MemberSignatureScheme for DevSignatureScheme {
    fn commitment_of(&self, public_key: &MemberPublicKey) -> Commitment {
        Commitment(hash_to_field(&pk_bytes(public_key)))
    }

    fn verify(&self, public_key: &MemberPublicKey, message: &H256, signature: &[u8]) -> bool {
        constant_time_eq(&dev_signature(public_key, message), signature)
    }
}

/// Gateway-side member key pair for the dev scheme.
#[derive(Clone, Debug)]
pub struct DevSigner {
    public_key: MemberPublicKey,
}

impl DevSigner {
    pub fn from_seed(seed: u64) -> Self {
        let secret = keccak256(&seed.to_be_bytes());
        let mut x = secret.to_vec();
        x.push(0);
        let mut y = secret.to_vec();
        y.push(1);
        Self {
            public_key: [hash_to_field(&x), hash_to_field(&y)],
        }
    }

    pub fn public_key(&self) -> MemberPublicKey {
        self.public_key
    }

    pub fn commitment(&self) -> Commitment {
        DevSignatureScheme.commitment_of(&self.public_key)
    }

    pub fn sign(&self, message: &H256) -> Vec<u8> {
        dev_signature(&self.public_key, message).to_vec()
    }

    /// Encoded credential for a user operation signed over `message`.
    pub fn credential(&self, message: &H256) -> Bytes {
        MemberCredential {
            public_key: self.public_key,
            signature: self.sign(message),
        }
        .encode()
    }
}
