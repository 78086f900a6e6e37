//! Confirmation codes sent to a user's email during signup.

use rand::Rng;

/// Number of letter+digit pairs in a generated code.
pub const CODE_PAIRS: usize = 5;

/// Maximum stored length of a confirmation code.
pub const MAX_CODE_LENGTH: usize = 10;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Source of fresh confirmation codes.
///
/// Lives behind a trait object in the application state so tests can
/// substitute a deterministic generator.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_confirmation_code()
    }
}

/// Build a code of [`CODE_PAIRS`] repetitions of one ASCII letter followed by
/// one digit, e.g. `a1B2c3D4e5`.
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(CODE_PAIRS * 2);
    for _ in 0..CODE_PAIRS {
        code.push(LETTERS[rng.random_range(0..LETTERS.len())] as char);
        code.push(DIGITS[rng.random_range(0..DIGITS.len())] as char);
    }
    code
}

/// Exact, case-sensitive comparison of a submitted code against the stored one.
pub fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.as_bytes() == submitted.as_bytes()
}
