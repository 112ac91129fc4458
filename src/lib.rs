//! Random passwords of bounded, tunable entropy.
//!
//! Passwords are lowercase letters and digits with no repeated characters and
//! noncontiguous digits. Pick one of the supported bit-strength targets (or a
//! base length directly) and the builder does the rest:
//!
//! ```
//! let password = genpw::generate(80, genpw::Flags::NEED_UPPERCASE)?;
//! assert_eq!(password.len(), 17);
//! # Ok::<(), genpw::Error>(())
//! ```

use std::ops::{BitOr, BitOrAssign};

use zeroize::Zeroize;

pub mod password_generation;
mod strength;

pub use password_generation::{generate_for_strength, generate_password};
pub use strength::{base_length, bit_strength};

/// Generate a password for a target bit strength, using the thread-local
/// CSPRNG.
///
/// See [`generate_for_strength`] for the strength-to-length mapping.
pub fn generate(bit_strength: u32, flags: Flags) -> Result<Password, Error> {
    generate_for_strength(&mut rand::thread_rng(), bit_strength, flags)
}

/// Generate a password of a given base length (8 to 36), using the
/// thread-local CSPRNG.
///
/// See [`generate_password`] for what the passwords look like.
pub fn generate_length(base_length: u32, flags: Flags) -> Result<Password, Error> {
    generate_password(&mut rand::thread_rng(), base_length, flags)
}

/// The ways strength mapping or password generation can fail.
///
/// Both entry points validate their input up front and produce nothing on
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("base length {0} is outside the supported range of 8 to 36 characters")]
    BaseLengthOutOfRange(u32),
    #[error("bit strength {0} exceeds the strongest supported target")]
    BitStrengthOutOfRange(u32),
}

/// Password policy flags, combinable with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u32);

impl Flags {
    /// No post-processing.
    pub const NONE: Flags = Flags(0);
    /// Uppercase the leftmost letter of the generated password.
    pub const NEED_UPPERCASE: Flags = Flags(1);
    /// Append a `!` to the generated password.
    pub const NEED_SYMBOL: Flags = Flags(2);

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

/// A generated password.
///
/// The backing string is wiped when the value is dropped, and `Debug` output
/// does not reveal the contents.
pub struct Password(String);

opaque_debug::implement!(Password);

impl Password {
    pub(crate) fn new(password: String) -> Password {
        Password(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
