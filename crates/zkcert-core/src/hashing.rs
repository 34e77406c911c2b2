/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash a sequence of fields, each prefixed with its little-endian u64 length
/// so that field boundaries cannot be shifted between inputs.
pub fn hash_fields(fields: &[&[u8]]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for field in fields {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field);
    }
    *hasher.finalize().as_bytes()
}

/// Create a BLAKE3 commitment: H(value || nonce).
pub fn create_commitment(value: &[u8], nonce: &[u8; 32]) -> Hash {
    let mut input = Vec::with_capacity(value.len() + 32);
    input.extend_from_slice(value);
    input.extend_from_slice(nonce);
    hash(&input)
}

/// Verify a BLAKE3 commitment by recomputing H(value || nonce).
pub fn verify_commitment(value: &[u8], nonce: &[u8; 32], commitment: &Hash) -> bool {
    create_commitment(value, nonce) == *commitment
}
