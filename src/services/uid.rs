// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pseudonymous user identifiers.
//!
//! A uid is `base64(HMAC-SHA256(secret_key, email))`. It joins GitHub issues
//! to FullStory sessions without either system ever seeing the email.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Derive the pseudonymous uid for `email`.
pub fn derive_uid(secret_key: &[u8], email: &str) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret_key)
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(email.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_is_deterministic() {
        let a = derive_uid(b"secret", "user@example.com");
        let b = derive_uid(b"secret", "user@example.com");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_emails_give_distinct_uids() {
        let a = derive_uid(b"secret", "alice@example.com");
        let b = derive_uid(b"secret", "bob@example.com");
        assert_ne!(a, b);
    }

    #[test]
    fn test_secret_changes_uid() {
        let a = derive_uid(b"secret-one", "alice@example.com");
        let b = derive_uid(b"secret-two", "alice@example.com");
        assert_ne!(a, b);
    }

    #[test]
    fn test_uid_matches_rfc4231_vector() {
        // RFC 4231 test case 2
        let uid = derive_uid(b"Jefe", "what do ya want for nothing?");
        let expected = hex::decode(
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843",
        )
        .unwrap();
        assert_eq!(uid, STANDARD.encode(expected));
        assert_eq!(uid.len(), 44);
    }
}
