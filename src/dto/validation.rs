//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted participant display name, in characters.
pub const MAX_PARTICIPANT_NAME_LEN: usize = 64;

/// Validates that a participant name has visible characters and a reasonable length.
///
/// # Examples
///
/// ```ignore
/// validate_participant_name("Team Alpha") // Ok
/// validate_participant_name("   ")        // Err - blank
/// ```
pub fn validate_participant_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("participant_name_blank");
        err.message = Some("Participant name must not be blank".into());
        return Err(err);
    }

    let length = trimmed.chars().count();
    if length > MAX_PARTICIPANT_NAME_LEN {
        let mut err = ValidationError::new("participant_name_length");
        err.message = Some(
            format!(
                "Participant name must be at most {MAX_PARTICIPANT_NAME_LEN} characters (got {length})"
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_participant_name_valid() {
        assert!(validate_participant_name("Team Alpha").is_ok());
        assert!(validate_participant_name("  padded  ").is_ok());
        assert!(validate_participant_name("é").is_ok());
    }

    #[test]
    fn test_validate_participant_name_blank() {
        assert!(validate_participant_name("").is_err());
        assert!(validate_participant_name("   ").is_err());
        assert!(validate_participant_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_participant_name_too_long() {
        let long = "x".repeat(MAX_PARTICIPANT_NAME_LEN + 1);
        assert!(validate_participant_name(&long).is_err());
        assert!(validate_participant_name(&long[1..]).is_ok());
    }
}
