use crate::error::AppError;

const COUNTRY_PREFIX: &str = "+62";

/// Accepts any phone number starting with the Indonesian country code.
/// Only the prefix is checked; length and digits are not.
pub fn validate_phone_number(phone_number: &str) -> Result<(), AppError> {
    if !phone_number.starts_with(COUNTRY_PREFIX) {
        return Err(AppError::InvalidFormat(
            "phone number should use Indonesia Country Code +62".into(),
        ));
    }
    Ok(())
}
