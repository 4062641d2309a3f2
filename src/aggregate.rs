// Group-by aggregation in first-seen key order.
//
// Key selectors may borrow from the records (`|r| r.category.as_str()`).
//
// Consumers that need a sorted view (priority lists, rankings) sort the
// returned vectors themselves.
use std::collections::HashMap;

use crate::types::CategoryBucket;

/// Insertion-ordered accumulator of `count`/`sum` per key.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    order: Vec<CategoryBucket>,
    index: HashMap<String, usize>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create zero-count buckets so they appear even when unseen.
    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut buckets = Self::new();
        for key in keys {
            buckets.slot(key.as_ref());
        }
        buckets
    }

    fn slot(&mut self, key: &str) -> &mut CategoryBucket {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                self.order.push(CategoryBucket {
                    key: key.to_string(),
                    count: 0,
                    sum: 0.0,
                    percent_of_total: 0.0,
                });
                self.index.insert(key.to_string(), self.order.len() - 1);
                self.order.len() - 1
            }
        };
        &mut self.order[idx]
    }

    pub fn add(&mut self, key: &str, value: f64) {
        let bucket = self.slot(key);
        bucket.count += 1;
        bucket.sum += value;
    }

    /// Fill `percent_of_total` (share of counts) and hand back the buckets.
    pub fn finish(mut self) -> Vec<CategoryBucket> {
        let total: usize = self.order.iter().map(|b| b.count).sum();
        for bucket in &mut self.order {
            bucket.percent_of_total = if total == 0 {
                0.0
            } else {
                bucket.count as f64 / total as f64 * 100.0
            };
        }
        self.order
    }
}

pub fn count_by<'a, T, K, F>(records: &'a [T], key: F) -> Vec<CategoryBucket>
where
    F: Fn(&'a T) -> K,
    K: AsRef<str>,
{
    sum_by(records, key, |_| 0.0)
}

pub fn sum_by<'a, T, K, F, V>(records: &'a [T], key: F, value: V) -> Vec<CategoryBucket>
where
    F: Fn(&'a T) -> K,
    K: AsRef<str>,
    V: Fn(&T) -> f64,
{
    let mut buckets = Buckets::new();
    for record in records {
        buckets.add(key(record).as_ref(), value(record));
    }
    buckets.finish()
}

/// Per-key arithmetic mean, in first-seen order.
pub fn mean_by<'a, T, K, F, V>(records: &'a [T], key: F, value: V) -> Vec<(String, f64)>
where
    F: Fn(&'a T) -> K,
    K: AsRef<str>,
    V: Fn(&T) -> f64,
{
    sum_by(records, key, value)
        .into_iter()
        .map(|b| {
            let avg = if b.count == 0 { 0.0 } else { b.sum / b.count as f64 };
            (b.key, avg)
        })
        .collect()
}

/// Partition records by key, keeping each group's internal order.
pub fn group_by<'a, T, K, F>(records: &'a [T], key: F) -> Vec<(String, Vec<&'a T>)>
where
    F: Fn(&'a T) -> K,
    K: AsRef<str>,
{
    let mut groups: Vec<(String, Vec<&'a T>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for record in records {
        let k = key(record);
        let k = k.as_ref();
        match index.get(k) {
            Some(idx) => groups[*idx].1.push(record),
            None => {
                index.insert(k.to_string(), groups.len());
                groups.push((k.to_string(), vec![record]));
            }
        }
    }
    groups
}

/// Distinct keys in first-seen order.
pub fn distinct<'a, T, K, F>(records: &'a [T], key: F) -> Vec<String>
where
    F: Fn(&'a T) -> K,
    K: AsRef<str>,
{
    group_by(records, key).into_iter().map(|(k, _)| k).collect()
}

pub fn find<'a>(buckets: &'a [CategoryBucket], key: &str) -> Option<&'a CategoryBucket> {
    buckets.iter().find(|b| b.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_keep_first_seen_order() {
        let labels = ["b", "a", "b", "c", "a", "b"];
        let buckets = count_by(&labels, |s| *s);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].percent_of_total, 50.0);
    }

    #[test]
    fn empty_input_gives_empty_mapping() {
        let empty: [&str; 0] = [];
        assert!(count_by(&empty, |s| *s).is_empty());
        assert!(group_by(&empty, |s| *s).is_empty());
    }

    #[test]
    fn sums_and_means_per_key() {
        let rows = [("x", 2.0), ("y", 10.0), ("x", 4.0)];
        let sums = sum_by(&rows, |r| r.0, |r| r.1);
        assert_eq!(find(&sums, "x").map(|b| b.sum), Some(6.0));
        let means = mean_by(&rows, |r| r.0, |r| r.1);
        assert_eq!(means, vec![("x".to_string(), 3.0), ("y".to_string(), 10.0)]);
    }

    #[test]
    fn seeded_keys_stay_at_zero_without_affecting_totals() {
        let mut buckets = Buckets::with_keys(["Achieved", "Behind"]);
        buckets.add("Behind", 0.0);
        buckets.add("Paused", 0.0);
        let out = buckets.finish();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].count, 0);
        assert_eq!(out[0].percent_of_total, 0.0);
        assert_eq!(out[1].percent_of_total, 50.0);
        assert_eq!(out[2].key, "Paused");
    }

    #[test]
    fn groups_preserve_member_order() {
        let rows = [(1, "a"), (2, "b"), (3, "a")];
        let groups = group_by(&rows, |r| r.1);
        assert_eq!(groups[0].0, "a");
        let ids: Vec<i32> = groups[0].1.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(distinct(&rows, |r| r.1), vec!["a", "b"]);
    }
}
