/// A single offense category with its count for one region
#[derive(Clone, Debug, PartialEq)]
pub struct OffenseRow {
    pub name: String,
    pub value: f64,
}

/// Aggregated offense data for one region: ordered rows plus a precomputed total.
/// Rows keep their input order; ranking for display is truncation, not sorting.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionStats {
    pub label: String,
    pub rows: Vec<OffenseRow>,
    pub total: f64,
}

impl RegionStats {
    /// Parse a two-column table (offense name, raw count string) into stats.
    ///
    /// Rows whose name trims to empty are skipped entirely. Count strings may
    /// carry thousands separators; anything unparseable degrades to 0 rather
    /// than failing the whole table.
    pub fn parse<'a, I>(table: I, label: &str) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rows = Vec::new();
        let mut total = 0.0;

        for (raw_name, raw_value) in table {
            let name = raw_name.trim();
            if name.is_empty() {
                continue;
            }

            let value = parse_count(raw_value);
            total += value;
            rows.push(OffenseRow {
                name: name.to_string(),
                value,
            });
        }

        Self {
            label: label.to_string(),
            rows,
            total,
        }
    }

    /// Largest row value, floored at 1 so bar scaling never divides by zero
    pub fn max_value(&self) -> f64 {
        self.rows.iter().fold(1.0_f64, |max, row| max.max(row.value))
    }
}

/// Parse a raw count cell: strip thousands separators, then read as f64.
/// Non-numeric, non-finite, and negative cells all coerce to 0.
fn parse_count(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}
