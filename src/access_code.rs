use std::collections::HashSet;

///Static allow-list of shared-secret entry codes, normalized once at load.
///Rotating codes requires a restart; there is no runtime mutation API.
pub struct AccessCodeRegistry {
    codes: HashSet<String>,
}

impl AccessCodeRegistry {
    pub fn new(codes: &[String]) -> Self {
        Self {
            codes: codes
                .iter()
                .map(|code| Self::normalize(code))
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    ///Case-insensitive, whitespace-insensitive membership check. An empty
    ///candidate is always invalid.
    pub fn is_valid(&self, candidate: &str) -> bool {
        let candidate = Self::normalize(candidate);
        !candidate.is_empty() && self.codes.contains(&candidate)
    }

    ///Uppercase and strip all whitespace, matching what the entry form does
    ///to codes before submitting them.
    pub fn normalize(raw: &str) -> String {
        raw.to_uppercase().split_whitespace().collect()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AccessCodeRegistry {
        AccessCodeRegistry::new(&["IC-1234".to_string(), " ic-5678 ".to_string()])
    }

    #[test]
    fn accepts_whitespace_and_case_variants() {
        let registry = registry();
        assert!(registry.is_valid("IC-1234"));
        assert!(registry.is_valid(" ic-1234 "));
        assert!(registry.is_valid("ic - 1234"));
        assert!(registry.is_valid("IC-5678"));
    }

    #[test]
    fn rejects_unknown_and_empty_candidates() {
        let registry = registry();
        assert!(!registry.is_valid("IC-9999"));
        assert!(!registry.is_valid(""));
        assert!(!registry.is_valid("   "));
    }

    #[test]
    fn blank_configured_entries_are_dropped() {
        let registry = AccessCodeRegistry::new(&["".to_string(), "  ".to_string()]);
        assert!(registry.is_empty());
        assert!(!registry.is_valid(""));
    }
}
