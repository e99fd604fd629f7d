use crate::domain::{CoverageRule, DutCriterion};

/// Joins two rules by intersecting their criteria.
///
/// Rules are joinable if they constrain exactly the same set of attributes
/// and every attribute's values intersect. The joined rule is named
/// `<cur>_<new>` and keeps the test suites of `cur`.
fn join_rules(cur: &CoverageRule, new: &CoverageRule) -> Option<CoverageRule> {
    if cur.dut_criteria.is_empty() || cur.dut_criteria.len() != new.dut_criteria.len() {
        tracing::trace!(
            "rules {} and {} have a different number of DutCriteria, not joining",
            cur.name,
            new.name
        );
        return None;
    }

    let mut joined_criteria = Vec::with_capacity(cur.dut_criteria.len());

    let pairs = cur.sorted_criteria().into_iter().zip(new.sorted_criteria());
    for (cur_criterion, new_criterion) in pairs {
        if cur_criterion.attribute_id != new_criterion.attribute_id {
            tracing::trace!(
                "rules {} and {} have different types of DutCriteria, not joining",
                cur.name,
                new.name
            );
            return None;
        }

        let values = cur_criterion.intersect(new_criterion);
        if values.is_empty() {
            tracing::trace!(
                "rules {} and {} have no intersection for attribute {}, not joining",
                cur.name,
                new.name,
                cur_criterion.attribute_id
            );
            return None;
        }

        joined_criteria.push(DutCriterion {
            attribute_id: cur_criterion.attribute_id.clone(),
            values,
        });
    }

    Some(CoverageRule {
        name: format!("{}_{}", cur.name, new.name),
        dut_criteria: joined_criteria,
        test_suites: cur.test_suites.clone(),
    })
}

/// Joins `new_rules` onto `cur_rules`.
///
/// Every rule in `cur_rules` is tried against every rule in `new_rules`, in
/// order. Two rules join if they constrain the same attributes and every
/// attribute's values intersect; the joined rule holds the intersections and
/// the test suites of the rule from `cur_rules`.
///
/// A rule takes part in at most one join per call: the first partner it
/// joins with wins, and neither rule is considered again. Rules that join
/// with nothing are passed through unchanged.
///
/// If `cur_rules` is empty, `new_rules` is returned as is, so the function
/// can be folded over the rule lists of successive requirements.
///
/// # Example
///
/// ```
/// use testplan::{
///     coverage::expand_coverage_rules,
///     domain::{CoverageRule, DutCriterion},
/// };
///
/// let rule = |name: &str, values: &[&str]| CoverageRule {
///     name: name.to_string(),
///     dut_criteria: vec![DutCriterion::new("attr1", values.iter().copied())],
///     test_suites: Vec::new(),
/// };
///
/// let expanded = expand_coverage_rules(
///     vec![rule("A", &["1", "2"])],
///     vec![rule("C", &["2", "3"])],
/// );
///
/// assert_eq!(expanded, vec![rule("A_C", &["2"])]);
/// ```
#[must_use]
pub fn expand_coverage_rules(
    cur_rules: Vec<CoverageRule>,
    new_rules: Vec<CoverageRule>,
) -> Vec<CoverageRule> {
    for rule in &new_rules {
        tracing::trace!("joining CoverageRule {}", rule.name);
    }

    if cur_rules.is_empty() {
        return new_rules;
    }

    let mut cur_joined = vec![false; cur_rules.len()];
    let mut new_joined = vec![false; new_rules.len()];
    let mut expanded = Vec::new();

    for (cur_index, cur) in cur_rules.iter().enumerate() {
        for (new_index, new) in new_rules.iter().enumerate() {
            if new_joined[new_index] {
                continue;
            }

            if let Some(joined) = join_rules(cur, new) {
                cur_joined[cur_index] = true;
                new_joined[new_index] = true;
                expanded.push(joined);
                break;
            }
        }
    }

    let unjoined_cur = cur_rules
        .into_iter()
        .zip(cur_joined)
        .filter_map(|(rule, joined)| (!joined).then_some(rule));
    let unjoined_new = new_rules
        .into_iter()
        .zip(new_joined)
        .filter_map(|(rule, joined)| (!joined).then_some(rule));

    expanded.extend(unjoined_cur);
    expanded.extend(unjoined_new);
    expanded
}
