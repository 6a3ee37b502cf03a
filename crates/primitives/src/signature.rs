use alloy_primitives::{Address, B256, Signature};

/// Length of the minimal recoverable ECDSA signature: `r || s || v`.
pub const SIGNATURE_LEN: usize = 65;

/// Width of one chunk inside a concatenated multi-signature blob.
///
/// A chunk is the 65 signature bytes followed by 7 reserved bytes that keep
/// chunks 8-byte aligned; the reserved bytes are ignored on decode.
pub const SIGNATURE_CHUNK_LEN: usize = 72;

/// Why signature bytes could not be turned into a signer address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature is {0} bytes, expected 65 or 72")]
    InvalidLength(usize),
    #[error("multi-signature blob of {0} bytes is not a non-zero multiple of 72")]
    InvalidBlobLength(usize),
    #[error("signature bytes do not recover to an address")]
    Unrecoverable,
}

/// Recover the address that signed `hash` from one signature chunk.
///
/// Accepts the minimal 65-byte triple or a lone padded 72-byte chunk. Any
/// other length, a malformed parity byte, or a failed curve recovery is an
/// error; the caller decides what a bad signature aborts.
pub fn recover_signer(hash: &B256, bytes: &[u8]) -> Result<Address, SignatureError> {
    if bytes.len() != SIGNATURE_LEN && bytes.len() != SIGNATURE_CHUNK_LEN {
        return Err(SignatureError::InvalidLength(bytes.len()));
    }
    let signature = Signature::from_raw(&bytes[..SIGNATURE_LEN])
        .map_err(|_| SignatureError::Unrecoverable)?;
    signature
        .recover_address_from_prehash(hash)
        .map_err(|_| SignatureError::Unrecoverable)
}

/// Split a concatenated multi-signature blob into canonical chunks.
///
/// The blob length must be a non-zero multiple of [`SIGNATURE_CHUNK_LEN`];
/// chunks are yielded in blob order.
pub fn split_chunks(blob: &[u8]) -> Result<impl Iterator<Item = &[u8]>, SignatureError> {
    if blob.is_empty() || blob.len() % SIGNATURE_CHUNK_LEN != 0 {
        return Err(SignatureError::InvalidBlobLength(blob.len()));
    }
    Ok(blob.chunks_exact(SIGNATURE_CHUNK_LEN))
}

/// Recover one signer per chunk of `blob`, in blob order.
///
/// Recovery is mechanical; membership and duplicate policy are the
/// caller's. Keeping the stages separate keeps both testable.
pub fn recover_all(hash: &B256, blob: &[u8]) -> Result<Vec<Address>, SignatureError> {
    split_chunks(blob)?
        .map(|chunk| recover_signer(hash, chunk))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;
    use test_case::test_case;

    fn signed_chunk(signer: &PrivateKeySigner, hash: &B256) -> [u8; SIGNATURE_CHUNK_LEN] {
        let mut chunk = [0u8; SIGNATURE_CHUNK_LEN];
        chunk[..SIGNATURE_LEN]
            .copy_from_slice(&signer.sign_hash_sync(hash).unwrap().as_bytes());
        chunk
    }

    #[test]
    fn recovers_the_signing_address() {
        let signer = PrivateKeySigner::random();
        let hash = B256::random();
        let signature = signer.sign_hash_sync(&hash).unwrap();

        let recovered = recover_signer(&hash, &signature.as_bytes()).unwrap();
        assert_eq!(recovered, signer.address());

        // A different hash recovers to a different address, not an error.
        let other = recover_signer(&B256::random(), &signature.as_bytes()).unwrap();
        assert_ne!(other, signer.address());
    }

    #[test]
    fn padded_chunk_recovers_identically() {
        let signer = PrivateKeySigner::random();
        let hash = B256::random();
        let chunk = signed_chunk(&signer, &hash);

        assert_eq!(recover_signer(&hash, &chunk).unwrap(), signer.address());

        // Reserved bytes are ignored, whatever their value.
        let mut dirty = chunk;
        dirty[SIGNATURE_LEN..].copy_from_slice(&[0xff; 7]);
        assert_eq!(recover_signer(&hash, &dirty).unwrap(), signer.address());
    }

    #[test_case(0)]
    #[test_case(3)]
    #[test_case(64)]
    #[test_case(66)]
    #[test_case(130)]
    fn wrong_lengths_are_rejected(len: usize) {
        let hash = B256::random();
        assert_eq!(
            recover_signer(&hash, &vec![0u8; len]),
            Err(SignatureError::InvalidLength(len))
        );
    }

    #[test]
    fn garbage_bytes_do_not_recover() {
        let hash = B256::random();
        // Parity byte 0x7f is not a valid v value.
        let mut bytes = [0x01u8; SIGNATURE_LEN];
        bytes[64] = 0x7f;
        assert_eq!(
            recover_signer(&hash, &bytes),
            Err(SignatureError::Unrecoverable)
        );
    }

    #[test]
    fn blob_length_must_be_a_chunk_multiple() {
        let hash = B256::random();
        assert_eq!(
            recover_all(&hash, &[]),
            Err(SignatureError::InvalidBlobLength(0))
        );
        assert_eq!(
            recover_all(&hash, &vec![0u8; SIGNATURE_LEN]),
            Err(SignatureError::InvalidBlobLength(SIGNATURE_LEN))
        );
        assert_eq!(
            recover_all(&hash, &vec![0u8; SIGNATURE_CHUNK_LEN + 1]),
            Err(SignatureError::InvalidBlobLength(SIGNATURE_CHUNK_LEN + 1))
        );
    }

    #[test]
    fn recovers_chunks_in_blob_order() {
        let first = PrivateKeySigner::random();
        let second = PrivateKeySigner::random();
        let hash = B256::random();

        let mut blob = Vec::new();
        blob.extend_from_slice(&signed_chunk(&first, &hash));
        blob.extend_from_slice(&signed_chunk(&second, &hash));

        let recovered = recover_all(&hash, &blob).unwrap();
        assert_eq!(recovered, vec![first.address(), second.address()]);
    }
}
