//! Stock classification.
//!
//! Single source of truth for "in stock". Any label not recognised as
//! unavailable counts as available, including the empty string. The
//! `unknown` sentinel is the one exception and counts as unavailable.

/// Lowercase substrings that mark a label as unavailable.
const UNAVAILABLE_MARKERS: [&str; 2] = ["not available", "unavailable"];

/// Classify an availability label as in stock (`true`) or not.
pub fn is_in_stock(availability: &str) -> bool {
    let label = availability.to_lowercase();
    if label == "unknown" {
        return false;
    }
    !UNAVAILABLE_MARKERS.iter().any(|m| label.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_stock_labels() {
        assert!(is_in_stock("IN STOCK"));
        assert!(is_in_stock("IN_STOCK"));
        assert!(is_in_stock("Only 2 left"));
    }

    #[test]
    fn unavailable_labels() {
        assert!(!is_in_stock("Not available in this combination"));
        assert!(!is_in_stock("unavailable"));
        assert!(!is_in_stock("Currently UNAVAILABLE"));
    }

    #[test]
    fn unknown_is_not_in_stock() {
        assert!(!is_in_stock("unknown"));
        assert!(!is_in_stock("UNKNOWN"));
    }

    #[test]
    fn unrecognised_labels_fail_open() {
        assert!(is_in_stock(""));
        // Underscore form does not contain "not available".
        assert!(is_in_stock("NOT_AVAILABLE"));
        assert!(is_in_stock("unknown colour"));
    }
}
