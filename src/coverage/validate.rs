use crate::{
    coverage::Error,
    domain::{CoverageRule, DutAttributeList},
};

/// Checks that every attribute referenced by `rules` is declared in
/// `dut_attribute_list`.
///
/// # Errors
///
/// Returns [`Error::InvalidDutAttributes`] listing every offending attribute
/// id, once per criterion that references it.
pub fn check_dut_attributes_valid(
    rules: &[CoverageRule],
    dut_attribute_list: &DutAttributeList,
) -> Result<(), Error> {
    let valid_attributes = dut_attribute_list.ids();

    let invalid_attributes: Vec<String> = rules
        .iter()
        .flat_map(|rule| &rule.dut_criteria)
        .map(|criterion| criterion.attribute_id.as_str())
        .filter(|id| !valid_attributes.contains(id))
        .map(str::to_string)
        .collect();

    if invalid_attributes.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidDutAttributes(invalid_attributes))
    }
}
