//! Request correlation ids

use rand::Rng;

use crate::constants::{REQUEST_ID_ALPHABET, REQUEST_ID_LENGTH};

/// Random id of [`REQUEST_ID_LENGTH`] characters from `[0-9a-z]`
pub fn generate_request_id() -> String {
    let mut rng = rand::rng();
    (0..REQUEST_ID_LENGTH)
        .map(|_| char::from(REQUEST_ID_ALPHABET[rng.random_range(0..REQUEST_ID_ALPHABET.len())]))
        .collect()
}
