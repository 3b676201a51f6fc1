//! Slug derivation for item titles

use rand::Rng;

/// Number of base-36 characters appended to every slug
pub const SUFFIX_LEN: usize = 6;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Convert text to a URL-friendly slug
///
/// Transliterates to ASCII, lowercases, and collapses every run of other
/// characters into a single hyphen, trimming hyphens at either end.
pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// Encode `value` in base 36, left-padded with zeros to `width`
pub fn to_base36(mut value: u64, width: usize) -> String {
    let mut digits = Vec::with_capacity(width);

    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }

    while digits.len() < width {
        digits.push(b'0');
    }

    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// Random suffix in `[0, 36^6)` rendered as six base-36 characters
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    let upper = 36u64.pow(SUFFIX_LEN as u32);
    to_base36(rng.gen_range(0..upper), SUFFIX_LEN)
}

/// Derive a slug for `title` using the given RNG
pub fn derive_slug<R: Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    let base = slugify(title);
    let suffix = random_suffix(rng);

    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

/// Derive a slug for `title` using the thread-local RNG
pub fn generate_slug(title: &str) -> String {
    derive_slug(title, &mut rand::thread_rng())
}
