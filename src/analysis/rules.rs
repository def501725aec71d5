/// Recommendation rule tables.
///
/// Recommendations are chosen by keyword, first match wins, in the order the
/// rules appear in each table. Adding a hazard-specific recommendation means
/// adding a row; the selection code does not change.
///
/// Cluster rules match a region's set of observed cause categories exactly.
/// Audit rules match a finding's category by substring, so a category such
/// as "Transport Machinery" is picked up by the Machinery rule.

use crate::analysis::AnalysisDepth;
use crate::thresholds::{FindingSeverity, Priority};

// ---------------------------------------------------------------------------
// Cluster recommendations
// ---------------------------------------------------------------------------

pub struct ClusterRule {
    /// Cause category that triggers the rule.
    pub hazard: &'static str,
    /// Wording used by standard analysis.
    pub standard: &'static str,
    /// Wording used by deep analysis.
    pub deep: &'static str,
}

pub static CLUSTER_RULES: &[ClusterRule] = &[
    ClusterRule {
        hazard: "Ground Movement",
        standard: "Conduct geological surveys and implement systematic rock bolting. \
                   Schedule weekly roof inspections.",
        deep: "URGENT: Conduct immediate geological surveys. Implement systematic \
               rock bolting per MMR 112. Weekly roof inspections mandatory.",
    },
    ClusterRule {
        hazard: "Machinery",
        standard: "Enforce machinery safety protocols and operator certification. \
                   Install proximity sensors.",
        deep: "Enforce strict machinery safety protocols. All operators require \
               certification renewal. Install proximity warning systems.",
    },
    ClusterRule {
        hazard: "Transport",
        standard: "Review haul road conditions and implement speed limits. \
                   Install warning systems at intersections.",
        deep: "Review haul road conditions and implement speed limits. \
               Install warning systems at intersections.",
    },
];

pub const CLUSTER_FALLBACK_STANDARD: &str =
    "Conduct comprehensive safety audit and implement targeted training programs.";

pub const CLUSTER_FALLBACK_DEEP: &str =
    "Comprehensive safety audit required. Implement enhanced training and monitoring protocols.";

/// Picks the recommendation for a region from the full set of cause
/// categories observed there.
pub fn cluster_recommendation<S: AsRef<str>>(hazards: &[S], depth: AnalysisDepth) -> &'static str {
    let rule = CLUSTER_RULES
        .iter()
        .find(|rule| hazards.iter().any(|h| h.as_ref() == rule.hazard));

    match (rule, depth) {
        (Some(rule), AnalysisDepth::Standard) => rule.standard,
        (Some(rule), AnalysisDepth::Deep) => rule.deep,
        (None, AnalysisDepth::Standard) => CLUSTER_FALLBACK_STANDARD,
        (None, AnalysisDepth::Deep) => CLUSTER_FALLBACK_DEEP,
    }
}

// ---------------------------------------------------------------------------
// Audit recommendations
// ---------------------------------------------------------------------------

pub struct AuditRule {
    /// Substring of the finding category that triggers the rule.
    pub keyword: &'static str,
    pub action: &'static str,
    pub priority: Priority,
}

pub static AUDIT_RULES: &[AuditRule] = &[
    AuditRule {
        keyword: "Ground Movement",
        action: "Implement systematic rock bolting and roof support inspection protocols. \
                 Schedule weekly geological surveys.",
        priority: Priority::High,
    },
    AuditRule {
        keyword: "Machinery",
        action: "Enforce mandatory machinery safety checks and operator training \
                 certification programs.",
        priority: Priority::High,
    },
    AuditRule {
        keyword: "Electrical",
        action: "Conduct electrical safety audits and upgrade insulation systems. \
                 Ensure proper earthing.",
        priority: Priority::High,
    },
    AuditRule {
        keyword: "Transport",
        action: "Review transportation protocols and implement speed limits. \
                 Install proximity warning systems.",
        priority: Priority::Medium,
    },
];

/// Action and priority for an audit finding.
///
/// Categories no rule matches get a category-specific training directive,
/// high priority only when the finding is critical.
pub fn audit_action(category: &str, severity: FindingSeverity) -> (String, Priority) {
    if let Some(rule) = AUDIT_RULES.iter().find(|rule| category.contains(rule.keyword)) {
        return (rule.action.to_string(), rule.priority);
    }

    let priority = if severity == FindingSeverity::Critical {
        Priority::High
    } else {
        Priority::Medium
    };
    (
        format!(
            "Conduct targeted safety training for {} hazards.",
            category.to_lowercase()
        ),
        priority,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_movement_outranks_machinery_and_transport() {
        let hazards = ["Transport", "Machinery", "Ground Movement"];
        let rec = cluster_recommendation(&hazards, AnalysisDepth::Standard);
        assert!(rec.contains("geological surveys"), "got: {}", rec);
    }

    #[test]
    fn test_machinery_outranks_transport() {
        let hazards = ["Transport", "Machinery"];
        let rec = cluster_recommendation(&hazards, AnalysisDepth::Standard);
        assert!(rec.contains("machinery safety"), "got: {}", rec);
    }

    #[test]
    fn test_transport_rule_applies_at_both_depths() {
        let hazards = ["Transport", "Explosives"];
        for depth in [AnalysisDepth::Standard, AnalysisDepth::Deep] {
            let rec = cluster_recommendation(&hazards, depth);
            assert!(rec.contains("haul road"), "{:?} got: {}", depth, rec);
        }
    }

    #[test]
    fn test_deep_wording_is_urgent_for_ground_movement() {
        let rec = cluster_recommendation(&["Ground Movement"], AnalysisDepth::Deep);
        assert!(rec.starts_with("URGENT:"), "got: {}", rec);
    }

    #[test]
    fn test_cluster_rules_match_exact_category_only() {
        // "Ground Movement (Side Fall)" is a different category from "Ground Movement".
        let rec = cluster_recommendation(&["Ground Movement (Side Fall)"], AnalysisDepth::Standard);
        assert_eq!(rec, CLUSTER_FALLBACK_STANDARD);
    }

    #[test]
    fn test_fallback_wording_per_depth() {
        let hazards: [&str; 0] = [];
        assert_eq!(cluster_recommendation(&hazards, AnalysisDepth::Standard), CLUSTER_FALLBACK_STANDARD);
        assert_eq!(cluster_recommendation(&hazards, AnalysisDepth::Deep), CLUSTER_FALLBACK_DEEP);
    }

    #[test]
    fn test_audit_rules_force_priorities() {
        let (_, p) = audit_action("Ground Movement", FindingSeverity::Minor);
        assert_eq!(p, Priority::High);
        let (_, p) = audit_action("Electrical", FindingSeverity::Minor);
        assert_eq!(p, Priority::High);
        let (action, p) = audit_action("Transport", FindingSeverity::Critical);
        assert_eq!(p, Priority::Medium, "transport stays medium even when critical");
        assert!(action.contains("speed limits"));
    }

    #[test]
    fn test_audit_rules_match_by_substring() {
        let (action, p) = audit_action("Transport Machinery", FindingSeverity::Minor);
        assert_eq!(p, Priority::High);
        assert!(action.contains("machinery safety checks"), "got: {}", action);
    }

    #[test]
    fn test_generic_audit_action_inherits_priority_from_severity() {
        let (action, p) = audit_action("Explosives", FindingSeverity::Critical);
        assert_eq!(action, "Conduct targeted safety training for explosives hazards.");
        assert_eq!(p, Priority::High);

        let (_, p) = audit_action("Explosives", FindingSeverity::Major);
        assert_eq!(p, Priority::Medium);
    }
}
