//! Random password generation.

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

/// Length used when `generate` is called without one.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// ASCII letters, digits and punctuation.
pub const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
abcdefghijklmnopqrstuvwxyz\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Generate a password from the operating system's CSPRNG.
pub fn generate_password(length: usize) -> Zeroizing<String> {
    generate_password_with(&mut OsRng, length)
}

/// Generate a password, drawing each character uniformly and independently.
pub fn generate_password_with<R: Rng + CryptoRng + ?Sized>(
    rng: &mut R,
    length: usize,
) -> Zeroizing<String> {
    let mut password = Zeroizing::new(String::with_capacity(length));
    for _ in 0..length {
        let idx = rng.gen_range(0..PASSWORD_CHARSET.len());
        password.push(char::from(PASSWORD_CHARSET[idx]));
    }
    password
}
