//! Short code generation.
//!
//! Codes are drawn from a cryptographically secure entropy source, one
//! character at a time, uniformly over a 62-character alphanumeric alphabet.

use std::sync::Arc;

use crate::error::AppError;
use serde_json::json;

/// Characters a short code may contain.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every generated short code.
pub const SHORT_CODE_LENGTH: usize = 6;

/// Largest multiple of the alphabet size that fits in a byte.
///
/// Bytes at or above this value are discarded so `byte % 62` stays uniform.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Upper bound on refills before giving up on a misbehaving source.
const MAX_FILL_ROUNDS: usize = 64;

/// A source of random bytes.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RandomSourceFailure`] if the source cannot produce bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), AppError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), AppError> {
        getrandom::fill(dest).map_err(|e| AppError::RandomSourceFailure {
            reason: e.to_string(),
        })
    }
}

/// Generates random short codes.
///
/// # Examples
///
/// ```ignore
/// let generator = CodeGenerator::default();
/// let code = generator.generate(SHORT_CODE_LENGTH)?;
/// assert_eq!(code.len(), 6);
/// assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
/// ```
#[derive(Clone)]
pub struct CodeGenerator {
    entropy: Arc<dyn EntropySource>,
}

impl CodeGenerator {
    /// Creates a generator reading from the given entropy source.
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Generates a code of exactly `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `length` is zero.
    /// Returns [`AppError::RandomSourceFailure`] if the entropy source fails.
    pub fn generate(&self, length: usize) -> Result<String, AppError> {
        if length == 0 {
            return Err(AppError::invalid_input(
                "Short code length must be positive",
                json!({ "length": length }),
            ));
        }

        let mut code = String::with_capacity(length);

        for _ in 0..MAX_FILL_ROUNDS {
            let remaining = length - code.len();
            // A few spare bytes so one round usually survives rejections.
            let mut buffer = vec![0u8; remaining + remaining / 4 + 1];
            self.entropy.fill(&mut buffer)?;

            for byte in buffer {
                if byte >= ACCEPT_BELOW {
                    continue;
                }

                code.push(ALPHABET[byte as usize % ALPHABET.len()] as char);

                if code.len() == length {
                    return Ok(code);
                }
            }
        }

        Err(AppError::RandomSourceFailure {
            reason: format!("entropy source yielded no usable bytes in {MAX_FILL_ROUNDS} rounds"),
        })
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy))
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator").finish_non_exhaustive()
    }
}
