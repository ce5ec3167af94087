//! Verification code generation.

use rand::Rng;

use crate::models::CODE_LEN;

/// Six random decimal digits. Leading zeros are allowed.
pub fn generate_code() -> String {
    generate_code_with(&mut rand::thread_rng())
}

pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
