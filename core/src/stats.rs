//! Descriptive statistics primitives: describe, value counts, cross-tabulation.
//!
//! Conventions:
//!   - `std` is the sample standard deviation (n - 1 denominator),
//!     undefined for fewer than two values.
//!   - Quantiles interpolate linearly between closest ranks.
//!   - Anything undefined is `None`; callers decide how to fill it.

use std::collections::BTreeMap;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile `q` in [0, 1] of already-sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// The eight-number summary printed for every numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    pub const FIELDS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn of(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            count: values.len(),
            mean: mean(values),
            std: std_dev(values),
            min: sorted.first().copied(),
            q25: quantile_sorted(&sorted, 0.25),
            q50: quantile_sorted(&sorted, 0.50),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    /// Values in `FIELDS` order, count included.
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// `describe` of one column, partitioned by a grouping key (ascending).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedDescribe<K> {
    pub column: String,
    pub groups: Vec<(K, Describe)>,
}

impl<K: Ord + Clone> GroupedDescribe<K> {
    pub fn build<I>(column: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut buckets: BTreeMap<K, Vec<f64>> = BTreeMap::new();
        for (key, value) in pairs {
            buckets.entry(key).or_default().push(value);
        }
        Self {
            column: column.into(),
            groups: buckets
                .into_iter()
                .map(|(k, vals)| (k, Describe::of(&vals)))
                .collect(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&Describe> {
        self.groups.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }
}

/// Frequency of each distinct value, most frequent first, ties by key.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCounts<K> {
    pub column: String,
    pub counts: Vec<(K, usize)>,
    pub total: usize,
}

impl<K: Ord + Clone> ValueCounts<K> {
    pub fn build<I>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut tally: BTreeMap<K, usize> = BTreeMap::new();
        let mut total = 0;
        for v in values {
            *tally.entry(v).or_insert(0) += 1;
            total += 1;
        }
        let mut counts: Vec<(K, usize)> = tally.into_iter().collect();
        // Stable: keys already ascending, so ties keep key order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            column: column.into(),
            counts,
            total,
        }
    }

    pub fn count_of(&self, key: &K) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Same ordering as `counts`, as a percentage of the total.
    pub fn percentages(&self) -> Vec<(K, f64)> {
        self.counts
            .iter()
            .map(|(k, c)| (k.clone(), percent(*c, self.total)))
            .collect()
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Two-way frequency table. Rows and columns are sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab<R, C> {
    pub row_name: String,
    pub col_name: String,
    pub rows: Vec<R>,
    pub cols: Vec<C>,
    /// `counts[r][c]`, aligned with `rows` and `cols`.
    pub counts: Vec<Vec<usize>>,
}

impl<R: Ord + Clone, C: Ord + Clone> CrossTab<R, C> {
    pub fn build<I>(row_name: impl Into<String>, col_name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
    {
        let mut cells: BTreeMap<(R, C), usize> = BTreeMap::new();
        let mut row_keys: BTreeMap<R, ()> = BTreeMap::new();
        let mut col_keys: BTreeMap<C, ()> = BTreeMap::new();
        for (r, c) in pairs {
            row_keys.insert(r.clone(), ());
            col_keys.insert(c.clone(), ());
            *cells.entry((r, c)).or_insert(0) += 1;
        }

        let rows: Vec<R> = row_keys.into_keys().collect();
        let cols: Vec<C> = col_keys.into_keys().collect();
        let counts = rows
            .iter()
            .map(|r| {
                cols.iter()
                    .map(|c| cells.get(&(r.clone(), c.clone())).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            row_name: row_name.into(),
            col_name: col_name.into(),
            rows,
            cols,
            counts,
        }
    }

    pub fn get(&self, row: &R, col: &C) -> usize {
        let r = self.rows.iter().position(|k| k == row);
        let c = self.cols.iter().position(|k| k == col);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Each cell as a percentage of its row total. Every non-empty row sums to 100.
    pub fn row_percentages(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                row.iter().map(|&c| percent(c, total)).collect()
            })
            .collect()
    }
}
