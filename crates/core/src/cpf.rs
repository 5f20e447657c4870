//! CPF normalization, structural validation, and the lookup hash.
//!
//! A raw CPF is never stored or queried in plaintext. The stored forms
//! are the unsalted SHA-256 lookup hash (exact-match queries and
//! uniqueness) and the reversible blob produced by [`crate::crypto`].
//!
//! The lookup hash is deliberately unsalted: the same input must produce
//! the same digest across calls and process restarts so equality lookups
//! and the `uq_*` unique indexes keep working. Against an attacker who
//! can brute-force the 11-digit input space this is pseudonymization,
//! not cryptographic anonymization — an accepted, documented limitation.

use crate::error::CoreError;
use crate::hashing::sha256_hex;

/// Message surfaced for any structurally invalid CPF.
const INVALID_CPF: &str = "CPF inválido";

/// Strip formatting punctuation and validate the CPF check digits.
///
/// Accepts `"198.965.074-06"` and `"19896507406"` alike; returns the
/// bare 11-digit string. Fails with [`CoreError::InvalidCpf`] when the
/// stripped input is not exactly 11 digits or the two verifier digits do
/// not match (structural validity only, not registry existence).
pub fn normalize(raw: &str) -> Result<String, CoreError> {
    let digits: String = raw.chars().filter(|c| *c != '.' && *c != '-').collect();

    if digits.len() != 11 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidCpf(INVALID_CPF.into()));
    }
    if !check_digits_valid(&digits) {
        return Err(CoreError::InvalidCpf(INVALID_CPF.into()));
    }

    Ok(digits)
}

/// Compute the deterministic lookup hash of a normalized CPF.
pub fn lookup_hash(normalized: &str) -> String {
    sha256_hex(normalized.as_bytes())
}

/// CPF verifier-digit algorithm (mod-11 over positional weights).
///
/// Sequences of a single repeated digit pass the arithmetic but are not
/// valid CPFs and are rejected explicitly.
fn check_digits_valid(digits: &str) -> bool {
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

    let first = d[0];
    if d.iter().all(|&x| x == first) {
        return false;
    }

    verifier(&d[..9]) == d[9] && verifier(&d[..10]) == d[10]
}

/// Compute one verifier digit over the given prefix.
///
/// Weights run from `prefix.len() + 1` down to 2; the digit is
/// `(sum * 10) % 11 % 10`.
fn verifier(prefix: &[u32]) -> u32 {
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, &digit)| digit * (prefix.len() as u32 + 1 - i as u32))
        .sum();
    sum * 10 % 11 % 10
}
