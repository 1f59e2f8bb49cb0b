//! Payment authorization signing.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use booking_types::SigningCredential;

use crate::wire::Authorization;

type HmacSha256 = Hmac<Sha256>;

/// Produces the payer identity and signature for a transfer authorization.
pub trait PaymentSigner: Send + Sync + 'static {
    /// Payer account derived from the credential.
    fn payer(&self, credential: &SigningCredential) -> String;

    /// Signature over the authorization, `0x`-prefixed hex.
    fn sign(&self, credential: &SigningCredential, authorization: &Authorization) -> String;
}

/// HMAC-SHA256 signer keyed by the credential.
///
/// The payer id is the last 20 bytes of SHA-256(key), rendered like an
/// account address.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSigner;

impl HmacSigner {
    /// Verifies a signature using constant-time comparison.
    pub fn verify(
        &self,
        credential: &SigningCredential,
        authorization: &Authorization,
        signature: &str,
    ) -> bool {
        let expected = self.sign(credential, authorization);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}

impl PaymentSigner for HmacSigner {
    fn payer(&self, credential: &SigningCredential) -> String {
        let digest = Sha256::digest(credential.as_bytes());
        format!("0x{}", hex::encode(&digest[12..]))
    }

    fn sign(&self, credential: &SigningCredential, authorization: &Authorization) -> String {
        let mut mac = HmacSha256::new_from_slice(credential.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(canonical(authorization).as_bytes());
        format!("0x{}", hex::encode(mac.finalize().into_bytes()))
    }
}

fn canonical(a: &Authorization) -> String {
    [
        a.from.as_str(),
        a.to.as_str(),
        a.value.as_str(),
        a.valid_after.as_str(),
        a.valid_before.as_str(),
        a.nonce.as_str(),
    ]
    .join("|")
}
