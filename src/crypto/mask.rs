//! Partial-reveal masks for display. Total functions.

/// Placeholder returned when an SSN cannot be masked meaningfully.
pub const SSN_PLACEHOLDER: &str = "***-**-****";

/// Placeholder for account numbers shorter than four characters.
pub const ACCOUNT_PLACEHOLDER: &str = "****";

/// `***-**-1234` for nine-digit input, [`SSN_PLACEHOLDER`] otherwise.
pub fn mask_ssn(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 9 {
        return SSN_PLACEHOLDER.to_string();
    }
    format!("***-**-{}", &digits[5..])
}

/// Star all but the last four characters, keeping the input length.
///
/// Inputs shorter than four characters get the fixed [`ACCOUNT_PLACEHOLDER`].
pub fn mask_account_number(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() < 4 {
        return ACCOUNT_PLACEHOLDER.to_string();
    }

    let visible_from = chars.len() - 4;
    let mut masked = "*".repeat(visible_from);
    masked.extend(&chars[visible_from..]);
    masked
}
