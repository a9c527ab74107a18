// delay.rs — Delay-reference resolution.
//
// A delay reference points at a numeric field on a contract; the value
// is seconds. Only `number` field values are accepted, and only
// non-negative ones. Failures are local: the traversal treats the step
// as zero delay and records a warning.

use cs_model::{DelayRef, DiscoveredSnapshot, FieldValue};

use crate::error::DelayError;

/// Resolves delay references against one snapshot.
pub struct DelayResolver<'a> {
    snapshot: &'a DiscoveredSnapshot,
}

impl<'a> DelayResolver<'a> {
    pub fn new(snapshot: &'a DiscoveredSnapshot) -> Self {
        Self { snapshot }
    }

    /// Read the referenced field as a non-negative number of seconds.
    pub fn resolve(&self, delay_ref: &DelayRef) -> Result<u64, DelayError> {
        let entry = self
            .snapshot
            .entry(&delay_ref.contract_address)
            .ok_or_else(|| DelayError::DelayContractMissing(delay_ref.contract_address.clone()))?;

        let value = entry
            .field(&delay_ref.field_name)
            .ok_or_else(|| DelayError::DelayFieldMissing {
                contract: delay_ref.contract_address.clone(),
                field: delay_ref.field_name.clone(),
            })?;

        let FieldValue::Number { value: decimal } = value else {
            return Err(DelayError::DelayNotNumeric {
                contract: delay_ref.contract_address.clone(),
                field: delay_ref.field_name.clone(),
            });
        };

        let decimal = decimal.trim();
        if decimal.starts_with('-') {
            return Err(DelayError::DelayNegative {
                contract: delay_ref.contract_address.clone(),
                field: delay_ref.field_name.clone(),
            });
        }
        decimal
            .parse::<u64>()
            .map_err(|_| DelayError::DelayNotNumeric {
                contract: delay_ref.contract_address.clone(),
                field: delay_ref.field_name.clone(),
            })
    }
}
