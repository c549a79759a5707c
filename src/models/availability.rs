//! Availability reading extracted from the product endpoint.

use std::fmt;

use crate::services::classifier;

/// Raw availability label as reported upstream, e.g. `IN_STOCK`.
///
/// Missing or malformed upstream data is represented by the
/// [`AvailabilityReading::UNKNOWN`] sentinel rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvailabilityReading(String);

impl AvailabilityReading {
    /// Sentinel label for an absent or unreadable availability.
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Classify this reading; see [`classifier::is_in_stock`].
    pub fn is_in_stock(&self) -> bool {
        classifier::is_in_stock(&self.0)
    }
}

impl fmt::Display for AvailabilityReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AvailabilityReading {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sentinel() {
        let reading = AvailabilityReading::unknown();
        assert_eq!(reading.as_str(), "unknown");
        assert!(!reading.is_in_stock());
    }

    #[test]
    fn display_is_raw_label() {
        assert_eq!(AvailabilityReading::from("IN_STOCK").to_string(), "IN_STOCK");
    }
}
