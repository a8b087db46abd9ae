//! Runtime state of a dynamic property.

use serde::{Deserialize, Serialize};

use crate::id::PropertyId;
use crate::value::StateValue;

/// Last reported and last requested value of a dynamic property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyState {
    pub property_id: PropertyId,
    pub actual_value: Option<StateValue>,
    pub expected_value: Option<StateValue>,
    /// A requested value has been sent and not yet confirmed.
    pub pending: bool,
    pub valid: bool,
}

impl PropertyState {
    /// First state of a property, created from a device report.
    #[must_use]
    pub fn reported(property_id: PropertyId, actual_value: Option<StateValue>) -> Self {
        Self {
            property_id,
            actual_value,
            expected_value: None,
            pending: false,
            valid: true,
        }
    }

    /// Record a new device report. Expected value and pending flag are left
    /// untouched.
    pub fn report(&mut self, actual_value: Option<StateValue>) {
        self.actual_value = actual_value;
        self.valid = true;
    }
}
