//! Email normalization for staff lookups.

/// Lookup candidates for an email, in query order.
///
/// The address exactly as entered comes first, then its lowercased form when
/// that differs. Sign-up stores whatever case the user typed, so the roster
/// and the profile can disagree on case.
pub fn email_candidates(email: &str) -> Vec<String> {
    let mut candidates = vec![email.to_string()];
    let lowered = email.trim().to_lowercase();
    if lowered != email {
        candidates.push(lowered);
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_email_has_one_candidate() {
        assert_eq!(email_candidates("doctor@gmail.com"), vec!["doctor@gmail.com"]);
    }

    #[test]
    fn test_mixed_case_falls_back_to_lowercase() {
        assert_eq!(
            email_candidates("Doctor@Gmail.com"),
            vec!["Doctor@Gmail.com", "doctor@gmail.com"]
        );
    }

    #[test]
    fn test_whitespace_trimmed_in_fallback() {
        assert_eq!(
            email_candidates(" reception@clinic.in "),
            vec![" reception@clinic.in ", "reception@clinic.in"]
        );
    }
}
