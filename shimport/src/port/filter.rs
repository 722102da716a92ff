//! Narrowing an enumeration by text and USB identity.

use super::PortRecord;

/// Criteria used to narrow a port set.
///
/// A textual `pattern` is matched case-insensitively against every reported
/// descriptive field and succeeds if any field contains it. `vendor_id` and
/// `product_id` must match exactly. All present criteria must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchCriteria {
    /// Substring searched in device, description, hardware id, manufacturer,
    /// product and serial number.
    pub pattern: Option<String>,
    /// Required USB vendor ID.
    pub vendor_id: Option<u16>,
    /// Required USB product ID.
    pub product_id: Option<u16>,
}

impl MatchCriteria {
    /// Criteria that match every port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria matching a substring.
    pub fn matching(pattern: impl Into<String>) -> Self {
        Self::new().pattern(pattern)
    }

    /// Set the substring pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the required vendor ID.
    #[must_use]
    pub fn vendor_id(mut self, vendor_id: u16) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    /// Set the required product ID.
    #[must_use]
    pub fn product_id(mut self, product_id: u16) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// True when no criterion is given at all.
    ///
    /// An empty pattern still counts as a criterion (it matches every port).
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none() && self.vendor_id.is_none() && self.product_id.is_none()
    }

    /// Check whether a single port satisfies these criteria.
    pub fn matches(&self, port: &PortRecord) -> bool {
        if let Some(pattern) = &self.pattern {
            let needle = pattern.to_lowercase();
            if !port
                .searchable_fields()
                .any(|field| field.to_lowercase().contains(&needle))
            {
                return false;
            }
        }

        if self.vendor_id.is_some() && port.vendor_id != self.vendor_id {
            return false;
        }
        if self.product_id.is_some() && port.product_id != self.product_id {
            return false;
        }

        true
    }
}

/// Keep the ports satisfying `criteria`, preserving input order.
pub fn filter_ports(ports: &[PortRecord], criteria: &MatchCriteria) -> Vec<PortRecord> {
    ports
        .iter()
        .filter(|port| criteria.matches(port))
        .cloned()
        .collect()
}
