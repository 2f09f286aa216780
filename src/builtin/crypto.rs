//! Hash and signature-verification builtins. Only call signatures and
//! output encodings are specified here; the actual primitives are
//! delegated to vetted RustCrypto/dalek crates.

use blake2::Blake2b;
use blake2::digest::consts::{U28, U32};
use digest::Digest;
use ed25519_dalek::{Signature as EdSignature, Verifier, VerifyingKey};
use k256::ecdsa::signature::Verifier as _;
use sha2::Sha256;
use sha3::{Keccak256, Sha3_256};

use super::{runtime_error, type_error, Builtin};
use crate::error::UplcResult;
use crate::value::Value;

fn bytes1<'a>(b: Builtin, args: &'a [Value]) -> UplcResult<&'a [u8]> {
    args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))
}

fn bytes3<'a>(b: Builtin, args: &'a [Value]) -> UplcResult<(&'a [u8], &'a [u8], &'a [u8])> {
    match (args.first(), args.get(1), args.get(2)) {
        (Some(Value::ByteString(x)), Some(Value::ByteString(y)), Some(Value::ByteString(z))) => {
            Ok((x, y, z))
        }
        _ => Err(type_error(b)),
    }
}

pub fn sha2_256(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let msg = bytes1(b, args)?;
    Ok(Value::ByteString(Sha256::digest(msg).to_vec()))
}

pub fn sha3_256(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let msg = bytes1(b, args)?;
    Ok(Value::ByteString(Sha3_256::digest(msg).to_vec()))
}

pub fn keccak_256(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let msg = bytes1(b, args)?;
    Ok(Value::ByteString(Keccak256::digest(msg).to_vec()))
}

pub fn blake2b_256(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let msg = bytes1(b, args)?;
    Ok(Value::ByteString(Blake2b::<U32>::digest(msg).to_vec()))
}

pub fn blake2b_224(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let msg = bytes1(b, args)?;
    Ok(Value::ByteString(Blake2b::<U28>::digest(msg).to_vec()))
}

pub fn ripemd_160(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let msg = bytes1(b, args)?;
    Ok(Value::ByteString(ripemd::Ripemd160::digest(msg).to_vec()))
}

pub fn verify_ed25519(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (pubkey, message, signature) = bytes3(b, args)?;
    let pubkey: [u8; 32] = pubkey
        .try_into()
        .map_err(|_| runtime_error(b, "public key must be 32 bytes"))?;
    let signature: [u8; 64] = signature
        .try_into()
        .map_err(|_| runtime_error(b, "signature must be 64 bytes"))?;
    let verifying_key = VerifyingKey::from_bytes(&pubkey)
        .map_err(|e| runtime_error(b, format!("invalid public key: {e}")))?;
    let signature = EdSignature::from_bytes(&signature);
    Ok(Value::Bool(verifying_key.verify(message, &signature).is_ok()))
}

pub fn verify_ecdsa_secp256k1(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (pubkey, message, signature) = bytes3(b, args)?;
    let verifying_key = k256::ecdsa::VerifyingKey::from_sec1_bytes(pubkey)
        .map_err(|e| runtime_error(b, format!("invalid public key: {e}")))?;
    let signature = k256::ecdsa::Signature::from_slice(signature)
        .map_err(|e| runtime_error(b, format!("invalid signature: {e}")))?;
    Ok(Value::Bool(verifying_key.verify(message, &signature).is_ok()))
}

pub fn verify_schnorr_secp256k1(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (pubkey, message, signature) = bytes3(b, args)?;
    let verifying_key = k256::schnorr::VerifyingKey::from_bytes(pubkey)
        .map_err(|e| runtime_error(b, format!("invalid public key: {e}")))?;
    let signature = k256::schnorr::Signature::try_from(signature)
        .map_err(|e| runtime_error(b, format!("invalid signature: {e}")))?;
    Ok(Value::Bool(verifying_key.verify(message, &signature).is_ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha2_256_produces_32_bytes() {
        let r = sha2_256(Builtin::Sha2_256, &[Value::ByteString(b"hello".to_vec())]).unwrap();
        match r {
            Value::ByteString(b) => assert_eq!(b.len(), 32),
            _ => panic!("expected bytestring"),
        }
    }

    #[test]
    fn blake2b_224_produces_28_bytes() {
        let r = blake2b_224(Builtin::Blake2b224, &[Value::ByteString(b"hello".to_vec())]).unwrap();
        match r {
            Value::ByteString(b) => assert_eq!(b.len(), 28),
            _ => panic!("expected bytestring"),
        }
    }

    #[test]
    fn ed25519_rejects_malformed_key_length() {
        let r = verify_ed25519(
            Builtin::VerifyEd25519Signature,
            &[
                Value::ByteString(vec![0u8; 4]),
                Value::ByteString(b"msg".to_vec()),
                Value::ByteString(vec![0u8; 64]),
            ],
        );
        assert!(r.is_err());
    }
}
