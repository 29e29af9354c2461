use energy_client::domain::RawDeltaRecord;

/// Numeric value of `field` on every record, in order. Records where the field
/// is missing or not a number leave a hole (`None`).
pub fn extract_field(records: &[&RawDeltaRecord], field: &str) -> Vec<Option<f64>> {
    records.iter().map(|r| r.field(field)).collect()
}
