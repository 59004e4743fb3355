//! Phone number normalisation.

/// Normalise a phone number to E.164 form.
///
/// Non-digit characters are dropped first. Numbers that look like local
/// Pakistani numbers get the `+92` country code:
///
/// - `92XXXXXXXXXX` (12+ digits) becomes `+92XXXXXXXXXX`
/// - `0XXXXXXXXXX` (11 digits) becomes `+92XXXXXXXXXX`
/// - `XXXXXXXXXX` (10 digits) becomes `+92XXXXXXXXXX`
///
/// Anything else is returned as `+` followed by its digits. An input with
/// no digits at all yields an empty string.
pub fn normalize_to_e164(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return String::new();
    }

    if digits.starts_with("92") && digits.len() >= 12 {
        format!("+{}", digits)
    } else if digits.len() == 11 && digits.starts_with('0') {
        format!("+92{}", &digits[1..])
    } else if digits.len() == 10 {
        format!("+92{}", digits)
    } else {
        format!("+{}", digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_international_form_kept() {
        assert_eq!(normalize_to_e164("+92 300 1112233"), "+923001112233");
        assert_eq!(normalize_to_e164("923001112233"), "+923001112233");
    }

    #[test]
    fn test_local_forms_get_country_code() {
        assert_eq!(normalize_to_e164("03001112233"), "+923001112233");
        assert_eq!(normalize_to_e164("3001112233"), "+923001112233");
        assert_eq!(normalize_to_e164("0300-111-2233"), "+923001112233");
    }

    #[test]
    fn test_other_numbers_get_plus() {
        assert_eq!(normalize_to_e164("+1 (234) 567-8900"), "+12345678900");
        assert_eq!(normalize_to_e164("4479460"), "+4479460");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_to_e164(""), "");
        assert_eq!(normalize_to_e164("not a number"), "");
    }
}
