use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Length of a payment reference
pub const PAYMENT_REFERENCE_LEN: usize = 10;

const REFERENCE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a short lowercase base-36 payment reference, e.g. `k3f9x0a2qz`.
///
/// Not unique across sessions; it only needs to identify one payment on a
/// receipt.
pub fn payment_reference() -> String {
    let mut rng = rand::thread_rng();
    (0..PAYMENT_REFERENCE_LEN)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect()
}

/// Long human-readable date in day-month-year order: `19 October 2026`
pub fn long_date(date: NaiveDate) -> String {
    format!("{} {}", date.day(), date.format("%B %Y"))
}

/// Today's local date in [`long_date`] form
pub fn today_long() -> String {
    long_date(chrono::Local::now().date_naive())
}
