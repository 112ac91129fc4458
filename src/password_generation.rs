//! The password builder: class split, unique sampling, shuffle, and policy
//! flags.

use rand::{CryptoRng, Rng};
use zeroize::Zeroize;

use crate::{strength, Error, Flags, Password};

const LETTERS: [u8; 26] = *b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: [u8; 10] = *b"0123456789";

// Probability that the character beyond the even class split is a letter,
// expressed as EXTRA_LETTER[n - 8] chances in EXTRA_CHAR_MAX[n - 8] + 1.
// These are the key-space ratios from `extra_char_odds` with common factors
// removed; base length 36 has no entry because its split is fixed.
#[cfg(not(feature = "calculate-probability"))]
const EXTRA_LETTER: [u32; 28] = [
    441, 10, 171, 1482, 10, 935, 256, 41, 9035, 1274, 9212, 1659, 61952, 55913, 205139, 5937,
    44859, 160227, 5770, 2072021, 592009, 4292123, 1330205, 342987, 696864, 38567075, 20980492,
    5431341,
];
#[cfg(not(feature = "calculate-probability"))]
const EXTRA_CHAR_MAX: [u32; 28] = [
    840, 20, 394, 2608, 18, 1921, 570, 74, 17746, 2698, 16346, 3148, 126526, 123722, 375666,
    11704, 96130, 280399, 10908, 4292075, 1369029, 7630450, 2630852, 781248, 1097560, 69420746,
    47206114, 19552830,
];

/// Generate a random password of `base_length` characters (8 to 36).
///
/// Passwords are lowercase letters and digits: floor(base_length * 10.125 /
/// 36) digits, one fewer letter than the remainder, and one more character of
/// either class, chosen in proportion to the key space each class adds.
/// Characters never repeat and the digits never end up as one contiguous
/// block. At base length 36 the full alphabet and digit set are used.
///
/// Note that `rand`'s underlying uniform sampler does the right thing to
/// prevent bias: if it can't generate a value that is within the given range
/// (or really, a multiple of the range), it re-samples.
pub fn generate_password<R>(rng: &mut R, base_length: u32, flags: Flags) -> Result<Password, Error>
where
    R: Rng + CryptoRng,
{
    if !(8..=36).contains(&base_length) {
        return Err(Error::BaseLengthOutOfRange(base_length));
    }
    let n = base_length as usize;

    // num_digits = floor(10.125 * n / 36). Using 10.125 rather than 10 gives
    // lengths 25 and 32 one more digit, which increases their key space by
    // 0.76% and 0.80% respectively. The EXTRA_* tables encode this split.
    let mut num_digits = (10 * n + n / 8) / 36;
    let mut num_letters = n - num_digits - 1;
    if n == 36 {
        // 26 letters + 10 digits consume both pools; nothing to decide.
        num_letters += 1;
    } else if extra_char_is_letter(rng, n, num_digits, num_letters) {
        num_letters += 1;
    } else {
        num_digits += 1;
    }

    // Base password plus room for the optional symbol.
    let mut buf = [0u8; 37];
    sample_without_replacement(rng, LETTERS, &mut buf[..num_letters]);
    sample_without_replacement(rng, DIGITS, &mut buf[num_letters..n]);

    // Shuffle, drawing the swap partner from the whole range each round.
    // Rejected and redrawn while all the digits sit in one contiguous run; a
    // retry is expected behavior, not a failure.
    loop {
        for i in 0..n {
            let j = rng.gen_range(0..n);
            buf.swap(i, j);
        }
        if !all_digits_contiguous(&buf[..n], num_digits) {
            break;
        }
    }

    let mut length = n;
    if flags.contains(Flags::NEED_UPPERCASE) {
        if let Some(first_letter) = buf[..n].iter_mut().find(|c| c.is_ascii_lowercase()) {
            *first_letter = first_letter.to_ascii_uppercase();
        }
    }
    if flags.contains(Flags::NEED_SYMBOL) {
        buf[n] = b'!';
        length += 1;
    }

    let password = Password::new(buf[..length].iter().map(|&c| char::from(c)).collect());
    buf.zeroize();
    Ok(password)
}

/// Generate a random password for a target bit strength of at most 128 bits.
///
/// The strength is mapped through [`crate::base_length`] first, so the same
/// coarse targets apply.
pub fn generate_for_strength<R>(
    rng: &mut R,
    bit_strength: u32,
    flags: Flags,
) -> Result<Password, Error>
where
    R: Rng + CryptoRng,
{
    let base_length = strength::base_length(bit_strength)?;
    generate_password(rng, base_length, flags)
}

/// Decide the class of the character beyond the even split.
///
/// With an extra letter the key space holds
/// (26 P l+1)(10 P d)((n C d) - (l + 2)) passwords, with an extra digit
/// (26 P l)(10 P d+1)((n C d+1) - (l + 1)); the extra character is a letter
/// with probability a/(a + b) for those two counts.
fn extra_char_is_letter<R>(rng: &mut R, n: usize, num_digits: usize, num_letters: usize) -> bool
where
    R: Rng + CryptoRng,
{
    #[cfg(feature = "calculate-probability")]
    {
        let (x, y) = extra_char_odds(n as u64, num_digits as u64, num_letters as u64);
        rng.gen_range(0..=x + y - 1) < x
    }
    #[cfg(not(feature = "calculate-probability"))]
    {
        let _ = (num_digits, num_letters);
        rng.gen_range(0..=EXTRA_CHAR_MAX[n - 8]) < EXTRA_LETTER[n - 8]
    }
}

/// The exact x : y odds that the extra character is a letter, with enough
/// common factors removed that everything fits in 64-bit arithmetic.
#[cfg(any(feature = "calculate-probability", test))]
fn extra_char_odds(n: u64, num_digits: u64, num_letters: u64) -> (u64, u64) {
    // n! / (n - d)!
    let mut falling = 1u64;
    for i in (n - num_digits + 1)..=n {
        falling *= i;
    }
    // d!
    let mut factorial = 1u64;
    for i in 2..=num_digits {
        factorial *= i;
    }
    let combinations = falling / factorial;

    // x = (26 - l) * ((n C d)   - l - 2)
    // y = (10 - d) * ((n C d+1) - l - 1), with n C d+1 = (n C d)(n - d)/(d + 1)
    let x = (26 - num_letters) * (combinations - num_letters - 2);
    let y = (10 - num_digits)
        * ((combinations * (n - num_digits)) / (num_digits + 1) - num_letters - 1);
    (x, y)
}

// One maximal run of length num_digits means every digit in the password is
// adjacent, since there are only num_digits digits in total.
fn all_digits_contiguous(password: &[u8], num_digits: usize) -> bool {
    let mut run = 0;
    for (i, c) in password.iter().enumerate() {
        if c.is_ascii_digit() {
            if i > 0 && !password[i - 1].is_ascii_digit() {
                run = 0;
            }
            run += 1;
            if run == num_digits {
                return true;
            }
        }
    }
    false
}

// Swap-to-back sampling without replacement: each draw takes a uniform index
// from the live prefix of the pool and retires the drawn slot to the back.
// The pool is wiped before returning so the undrawn remainder can't narrow
// down the drawn characters in a memory disclosure.
fn sample_without_replacement<R, const N: usize>(rng: &mut R, pool: [u8; N], out: &mut [u8])
where
    R: Rng + CryptoRng,
{
    let mut pool = pool;
    let mut max = N - 1;
    for slot in out.iter_mut() {
        let j = rng.gen_range(0..=max);
        *slot = pool[j];
        pool.swap(j, max);
        max = max.saturating_sub(1);
    }
    pool.zeroize();
}
