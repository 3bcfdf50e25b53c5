
use std::fmt;

/// Display string used for an uncalled allele in a genotype
pub const NO_CALL_STRING: &str = ".";

/// A single allele at a site.
/// Equality is defined purely on the display string, so a reference-flagged "T" and an alternate-flagged "T" compare equal.
#[derive(Clone, Debug, Eq)]
pub struct Allele {
    /// The bases (or symbolic value) for this allele
    display_string: String,
    /// If true, this is the reference allele for the site
    is_reference: bool
}

impl Allele {
    /// Generic constructor
    /// # Arguments
    /// * `display_string` - the bases for the allele, e.g. "ACGT"
    /// * `is_reference` - flags this as the reference allele
    pub fn new(display_string: impl Into<String>, is_reference: bool) -> Self {
        Self {
            display_string: display_string.into(),
            is_reference
        }
    }

    /// Creates a reference-flagged allele
    pub fn new_reference(display_string: impl Into<String>) -> Self {
        Self::new(display_string, true)
    }

    /// Creates an alternate (non-reference) allele
    pub fn new_alternate(display_string: impl Into<String>) -> Self {
        Self::new(display_string, false)
    }

    /// Creates the placeholder allele that shows up in uncalled genotypes, e.g. "./."
    pub fn no_call() -> Self {
        Self::new(NO_CALL_STRING, false)
    }

    /// Returns true if this allele is the no-call placeholder
    pub fn is_no_call(&self) -> bool {
        !self.is_reference && self.display_string == NO_CALL_STRING
    }

    /// Case-insensitive comparison of the display string against some other text, e.g. an INFO value
    /// # Arguments
    /// * `text` - the value to compare against
    pub fn matches_ignore_case(&self, text: &str) -> bool {
        self.display_string.eq_ignore_ascii_case(text)
    }

    // getters
    pub fn display_string(&self) -> &str {
        &self.display_string
    }

    pub fn is_reference(&self) -> bool {
        self.is_reference
    }
}

impl PartialEq for Allele {
    fn eq(&self, other: &Self) -> bool {
        self.display_string == other.display_string
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reference {
            write!(f, "{}*", self.display_string)
        } else {
            write!(f, "{}", self.display_string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_flag() {
        let ref_t = Allele::new_reference("T");
        let alt_t = Allele::new_alternate("T");
        assert_eq!(ref_t, alt_t);
        assert!(ref_t.is_reference());
        assert!(!alt_t.is_reference());
        assert_ne!(ref_t, Allele::new_reference("G"));
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        let lower = Allele::new_alternate("c");
        let upper = Allele::new_alternate("C");
        assert_ne!(lower, upper);
        assert!(lower.matches_ignore_case("C"));
        assert!(upper.matches_ignore_case("c"));
        assert!(!upper.matches_ignore_case("CA"));
    }

    #[test]
    fn test_no_call() {
        let nc = Allele::no_call();
        assert!(nc.is_no_call());
        assert_eq!(nc.display_string(), ".");
        assert!(!Allele::new_alternate("A").is_no_call());
    }

    #[test]
    fn test_display() {
        assert_eq!(Allele::new_reference("AC").to_string(), "AC*");
        assert_eq!(Allele::new_alternate("A").to_string(), "A");
    }
}
