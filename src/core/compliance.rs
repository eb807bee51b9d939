// LicUsage - core/compliance.rs
//
// Per-site compliance check over extracted records.
// A site passes when it reports the expected number of distinct
// ConfigureItemName values and at least the minimum number of distinct
// ResourceUsage values. Numeric Used/Total are not consulted.

use crate::core::model::{ComplianceSummary, SiteCompliance, UsageRecord};
use crate::util::constants;
use std::collections::{BTreeMap, HashSet};

/// Thresholds for the compliance predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceRules {
    /// Exact number of distinct configure items required per site.
    pub expected_configure_items: usize,
    /// Minimum number of distinct resource usage values per site.
    pub min_resource_usages: usize,
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            expected_configure_items: constants::DEFAULT_EXPECTED_CONFIGURE_ITEMS,
            min_resource_usages: constants::DEFAULT_MIN_RESOURCE_USAGES,
        }
    }
}

impl ComplianceRules {
    pub fn is_compliant(
        &self,
        distinct_configure_items: usize,
        distinct_resource_usages: usize,
    ) -> bool {
        distinct_configure_items == self.expected_configure_items
            && distinct_resource_usages >= self.min_resource_usages
    }
}

#[derive(Default)]
struct SiteTally<'a> {
    records: usize,
    configure_items: HashSet<&'a str>,
    resource_usages: HashSet<&'a str>,
}

/// Group records by site and evaluate each group.
///
/// Sites are reported in label order. An empty record set produces an empty
/// summary, which counts as all-compliant.
pub fn check(records: &[UsageRecord], rules: &ComplianceRules) -> ComplianceSummary {
    let mut tallies: BTreeMap<&str, SiteTally<'_>> = BTreeMap::new();
    for record in records {
        let tally = tallies.entry(record.site.as_str()).or_default();
        tally.records += 1;
        tally.configure_items.insert(record.configure_item_name.as_str());
        tally.resource_usages.insert(record.resource_usage.as_str());
    }

    let sites: Vec<SiteCompliance> = tallies
        .into_iter()
        .map(|(site, tally)| {
            let distinct_configure_items = tally.configure_items.len();
            let distinct_resource_usages = tally.resource_usages.len();
            let compliant = rules.is_compliant(distinct_configure_items, distinct_resource_usages);
            if !compliant {
                tracing::debug!(
                    site,
                    configure_items = distinct_configure_items,
                    resource_usages = distinct_resource_usages,
                    "Site fails compliance check"
                );
            }
            SiteCompliance {
                site: site.to_string(),
                records: tally.records,
                distinct_configure_items,
                distinct_resource_usages,
                compliant,
            }
        })
        .collect();

    let summary = ComplianceSummary { sites };
    tracing::info!(
        sites = summary.sites.len(),
        non_compliant = summary.non_compliant().len(),
        "Compliance check complete"
    );
    summary
}

/// One-paragraph human-readable verdict.
pub fn describe(summary: &ComplianceSummary, rules: &ComplianceRules) -> String {
    if summary.sites.is_empty() {
        "No site blocks found; nothing to check.".to_string()
    } else if summary.all_compliant() {
        format!(
            "All {} site(s) have {} unique ConfigureItemNames and at least {} ResourceUsage value(s).",
            summary.sites.len(),
            rules.expected_configure_items,
            rules.min_resource_usages
        )
    } else {
        format!(
            "Sites that do not meet the criteria: {}",
            summary.non_compliant().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(site: &str, item: &str, usage: &str) -> UsageRecord {
        UsageRecord::from_tokens(site, "Feature", item, usage)
    }

    #[test]
    fn test_only_site_with_two_items_is_non_compliant() {
        let records = vec![
            rec("A", "I1", "1/2"),
            rec("A", "I2", "1/2"),
            rec("A", "I3", "2/2"),
            rec("B", "I1", "1/2"),
            rec("B", "I1", "1/2"),
            rec("B", "I2", "1/2"),
            rec("C", "X", "0/1"),
            rec("C", "Y", "0/1"),
            rec("C", "Z", "0/1"),
        ];
        let summary = check(&records, &ComplianceRules::default());
        assert_eq!(summary.non_compliant(), vec!["B"]);
        assert!(!summary.all_compliant());

        let b = &summary.sites[1];
        assert_eq!(b.site, "B");
        assert_eq!(b.records, 3);
        assert_eq!(b.distinct_configure_items, 2);
        assert_eq!(b.distinct_resource_usages, 1);
    }

    #[test]
    fn test_sites_are_ordered_by_label() {
        let records = vec![rec("Z", "a", "1/1"), rec("M", "a", "1/1")];
        let summary = check(&records, &ComplianceRules::default());
        let sites: Vec<_> = summary.sites.iter().map(|s| s.site.as_str()).collect();
        assert_eq!(sites, vec!["M", "Z"]);
    }

    #[test]
    fn test_repeated_block_still_counts_distinct_items() {
        let mut records = Vec::new();
        for _ in 0..2 {
            records.push(rec("A", "I1", "1/2"));
            records.push(rec("A", "I2", "1/2"));
            records.push(rec("A", "I3", "1/2"));
        }
        let summary = check(&records, &ComplianceRules::default());
        assert!(summary.all_compliant());
        assert_eq!(summary.sites[0].records, 6);
    }

    #[test]
    fn test_missing_numbers_do_not_affect_verdict() {
        let records = vec![
            rec("A", "I1", "x/y"),
            rec("A", "I2", "?/2"),
            rec("A", "I3", "n/a"),
        ];
        assert!(check(&records, &ComplianceRules::default()).all_compliant());
    }

    #[test]
    fn test_empty_records_are_vacuously_compliant() {
        let summary = check(&[], &ComplianceRules::default());
        assert!(summary.sites.is_empty());
        assert!(summary.all_compliant());
        assert_eq!(
            describe(&summary, &ComplianceRules::default()),
            "No site blocks found; nothing to check."
        );
    }

    #[test]
    fn test_describe_lists_failing_sites() {
        let records = vec![rec("B", "I1", "1/2"), rec("D", "I1", "1/2")];
        let rules = ComplianceRules::default();
        let text = describe(&check(&records, &rules), &rules);
        assert_eq!(text, "Sites that do not meet the criteria: B, D");
    }

    #[test]
    fn test_custom_rules() {
        let rules = ComplianceRules {
            expected_configure_items: 2,
            min_resource_usages: 2,
        };
        let records = vec![rec("A", "I1", "1/2"), rec("A", "I2", "2/2")];
        assert!(check(&records, &rules).all_compliant());
    }
}
