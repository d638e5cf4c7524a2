//! Composition of public identifiers.
//!
//! A public identifier is the decimal concatenation of a fixed-length salt
//! followed by the magnitude of the real id, carrying the real id's sign:
//! `encode(-5, 1234, 4) == -12345`. Values whose magnitude has no more digits
//! than the salt length are not salted and decode to themselves with a zero
//! salt, so legacy ids keep working.
//!
//! `encode` is strict: the salt must have exactly `salt_len` digits.

use crate::{Error, Result};

use rand::Rng;

/// Largest supported salt length. A longer salt leaves no room for the real
/// id inside an `i64`.
pub const MAX_SALT_LENGTH: usize = 18;

/// Salt length used when none is configured.
pub const DEFAULT_SALT_LENGTH: usize = 4;

/// A public identifier split into its stored parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoded {
    /// The real, sequential id (sign carried from the public id)
    pub id: i64,

    /// The salt prefix, `0` when the value was not salted
    pub salt: i64,
}

impl Decoded {
    /// Returns `true` if the value carried a salt prefix.
    pub fn is_salted(&self) -> bool {
        self.salt != 0
    }
}

/// Number of decimal digits in `n`. Zero has one digit.
pub fn digit_len(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Compose a public id from a real id and a salt.
///
/// Fails when the salt is negative, when its digit count differs from
/// `salt_len`, or when the result does not fit in an `i64`.
pub fn encode(real_id: i64, salt: i64, salt_len: usize) -> Result<i64> {
    if salt < 0 {
        return Err(Error::negative_salt(salt));
    }

    if digit_len(salt as u64) != salt_len {
        return Err(Error::salt_length(salt, salt_len));
    }

    let magnitude = real_id.unsigned_abs();

    let composed = 10u64
        .checked_pow(digit_len(magnitude) as u32)
        .and_then(|shift| (salt as u64).checked_mul(shift))
        .and_then(|prefix| prefix.checked_add(magnitude))
        .and_then(|composed| i64::try_from(composed).ok())
        .ok_or_else(|| Error::public_id_overflow(real_id, salt))?;

    Ok(if real_id < 0 { -composed } else { composed })
}

/// Split a public id into its real id and salt.
pub fn decode(public_id: i64, salt_len: usize) -> Decoded {
    let magnitude = public_id.unsigned_abs();
    let len = digit_len(magnitude);

    if len <= salt_len {
        return Decoded {
            id: public_id,
            salt: 0,
        };
    }

    let divisor = 10u64.pow((len - salt_len) as u32);

    // Both parts are strictly smaller than the magnitude of an `i64`.
    let salt = (magnitude / divisor) as i64;
    let id = (magnitude % divisor) as i64;

    Decoded {
        id: if public_id < 0 { -id } else { id },
        salt,
    }
}

/// Returns `true` if `value` is long enough to carry a salt prefix.
pub fn is_potential_salt_id(value: i64, salt_len: usize) -> bool {
    digit_len(value.unsigned_abs()) > salt_len
}

/// Generate a salt of exactly `salt_len` digits.
///
/// # Panics
///
/// Panics if `salt_len` is zero or greater than [`MAX_SALT_LENGTH`].
pub fn generate_salt(salt_len: usize) -> i64 {
    generate_salt_with(&mut rand::thread_rng(), salt_len)
}

/// Same as [`generate_salt`], drawing from the given random source.
pub fn generate_salt_with<R: Rng + ?Sized>(rng: &mut R, salt_len: usize) -> i64 {
    assert!(
        (1..=MAX_SALT_LENGTH).contains(&salt_len),
        "salt length out of range; salt_len={salt_len}"
    );

    let low = 10i64.pow(salt_len as u32 - 1);
    let high = 10i64.pow(salt_len as u32) - 1;
    rng.gen_range(low..=high)
}
