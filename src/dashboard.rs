use crate::app::View;
use crate::stats::{OffenseRow, RegionStats};

/// How many breakdown rows the side panel shows. Rows are taken in source
/// order; the source data is already ranked upstream, so no re-sort here.
pub const BREAKDOWN_LIMIT: usize = 8;

/// Everything the side panel needs to draw, computed from the current view
/// and whatever stats loaded. Pure data: the renderer consumes this without
/// touching the projection logic.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardContent {
    pub breadcrumb: String,
    pub status: String,
    pub snapshot_label: String,
    pub total_offenses: Option<f64>,
    /// Regional total as a percentage of the national total, rounded to two
    /// decimal places. Only present when both stats loaded.
    pub share_of_parent: Option<f64>,
    pub breakdown_rows: Vec<OffenseRow>,
}

/// Project the current view and available stats into panel content.
///
/// Never fails: missing stats leave the derived fields empty while the text
/// fields are still populated. Calling this repeatedly with the same inputs
/// yields identical output.
pub fn project(
    view: View,
    national: Option<&RegionStats>,
    regional: Option<&RegionStats>,
) -> DashboardContent {
    let (breadcrumb, status, snapshot_label, applicable) = match view {
        View::National => (
            "USA (California focus)",
            "View: USA — hover California for CA stats; click California to zoom into Alameda.",
            "California 2024 (CSV roll-up)",
            national,
        ),
        View::Regional => (
            "USA ▸ California ▸ Alameda County",
            "View: California ▸ Alameda — click the map to go back to USA.",
            "Alameda County 2024 (CSV roll-up)",
            regional,
        ),
    };

    let share_of_parent = match (national, regional) {
        (Some(n), Some(r)) if n.total > 0.0 => Some(round2(r.total / n.total * 100.0)),
        _ => None,
    };

    let (total_offenses, breakdown_rows) = match applicable {
        Some(stats) => (
            Some(stats.total),
            stats.rows.iter().take(BREAKDOWN_LIMIT).cloned().collect(),
        ),
        None => (None, Vec::new()),
    };

    DashboardContent {
        breadcrumb: breadcrumb.to_string(),
        status: status.to_string(),
        snapshot_label: snapshot_label.to_string(),
        total_offenses,
        share_of_parent,
        breakdown_rows,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(label: &str, values: &[(&str, f64)]) -> RegionStats {
        let rows = values
            .iter()
            .map(|(name, value)| OffenseRow {
                name: name.to_string(),
                value: *value,
            })
            .collect::<Vec<_>>();
        let total = rows.iter().map(|r| r.value).sum();
        RegionStats {
            label: label.to_string(),
            rows,
            total,
        }
    }

    #[test]
    fn test_share_of_parent_rounds_to_two_places() {
        let national = stats("CA", &[("All", 1000.0)]);
        let regional = stats("Alameda", &[("All", 37.0)]);

        let content = project(View::National, Some(&national), Some(&regional));
        assert_eq!(content.share_of_parent, Some(3.7));

        // Same share regardless of which view is active
        let content = project(View::Regional, Some(&national), Some(&regional));
        assert_eq!(content.share_of_parent, Some(3.7));
    }

    #[test]
    fn test_share_absent_unless_both_present() {
        let national = stats("CA", &[("All", 1000.0)]);

        let content = project(View::National, Some(&national), None);
        assert_eq!(content.share_of_parent, None);

        let content = project(View::National, None, None);
        assert_eq!(content.share_of_parent, None);
    }

    #[test]
    fn test_missing_stats_degrade_but_text_survives() {
        let content = project(View::Regional, None, None);

        assert_eq!(content.total_offenses, None);
        assert!(content.breakdown_rows.is_empty());
        assert!(!content.breadcrumb.is_empty());
        assert!(!content.status.is_empty());
        assert!(!content.snapshot_label.is_empty());
    }

    #[test]
    fn test_breakdown_takes_first_eight_in_source_order() {
        let values: Vec<(String, f64)> = (0..12).map(|i| (format!("Offense {i}"), i as f64)).collect();
        let refs: Vec<(&str, f64)> = values.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        let national = stats("CA", &refs);

        let content = project(View::National, Some(&national), None);
        assert_eq!(content.breakdown_rows.len(), BREAKDOWN_LIMIT);
        // First eight in input order, even though later rows have larger values
        assert_eq!(content.breakdown_rows[0].name, "Offense 0");
        assert_eq!(content.breakdown_rows[7].name, "Offense 7");
    }

    #[test]
    fn test_view_selects_applicable_stats() {
        let national = stats("CA", &[("Robbery", 10.0)]);
        let regional = stats("Alameda", &[("Theft", 4.0)]);

        let content = project(View::National, Some(&national), Some(&regional));
        assert_eq!(content.total_offenses, Some(10.0));
        assert_eq!(content.breakdown_rows[0].name, "Robbery");

        let content = project(View::Regional, Some(&national), Some(&regional));
        assert_eq!(content.total_offenses, Some(4.0));
        assert_eq!(content.breakdown_rows[0].name, "Theft");
    }

    #[test]
    fn test_projection_is_idempotent() {
        let national = stats("CA", &[("Robbery", 10.0)]);
        let regional = stats("Alameda", &[("Theft", 4.0)]);

        let a = project(View::National, Some(&national), Some(&regional));
        let b = project(View::National, Some(&national), Some(&regional));
        assert_eq!(a, b);
    }
}
