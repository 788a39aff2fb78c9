//! Patron identity rules
//!
//! A patron is identified solely by their 6-digit library card number.
//! No separate identity record exists.

/// A patron ID is exactly 6 ASCII digit characters.
pub fn valid_patron_id(patron_id: &str) -> bool {
    patron_id.len() == 6 && patron_id.chars().all(|c| c.is_ascii_digit())
}
