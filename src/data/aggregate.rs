use std::collections::HashMap;

use crate::data::rows::GenreRow;

/// Categories with fewer membership rows are excluded from every downstream view.
pub const MIN_CATEGORY_COUNT: u32 = 5;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Per-category summary driving the scatter encoding.
pub struct CategoryAggregate {
    /// Category label (unique).
    pub label: String,
    /// Membership row count (>= [`MIN_CATEGORY_COUNT`]).
    pub count: u32,
    /// Mean quality metric across membership rows.
    pub avg_quality: f64,
    /// Summed reach metric across membership rows.
    pub total_reach: f64,
}

/// One (item, category) pair after splitting the multi-valued category field.
#[derive(Clone, Debug, PartialEq)]
pub struct Membership {
    /// Category label.
    pub label: String,
    /// Reach metric of the item.
    pub reach: f64,
    /// Quality metric of the item.
    pub quality: f64,
}

/// Split every valid row into one membership per category.
///
/// Rows missing a parseable reach, quality, or non-blank category are dropped. An item in
/// `n` categories contributes `n` memberships, so the result is not an item count.
pub fn explode_memberships(rows: &[GenreRow]) -> Vec<Membership> {
    let mut out = Vec::new();
    let mut dropped = 0usize;
    for row in rows {
        let (Some(cats), Some(reach), Some(quality)) = (
            row.categories.as_deref(),
            row.reach.as_ref().and_then(|f| f.to_f64()),
            row.quality.as_ref().and_then(|f| f.to_f64()),
        ) else {
            dropped += 1;
            continue;
        };

        let before = out.len();
        out.extend(
            cats.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|label| Membership {
                    label: label.to_string(),
                    reach,
                    quality,
                }),
        );
        if out.len() == before {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "dropped malformed genre rows");
    }
    out
}

/// Aggregate rows into per-category summaries, keeping only categories with at least
/// [`MIN_CATEGORY_COUNT`] memberships. Output follows first appearance in `rows`.
pub fn aggregate_categories(rows: &[GenreRow]) -> Vec<CategoryAggregate> {
    struct Acc {
        count: u32,
        quality_sum: f64,
        reach_sum: f64,
    }

    let mut order: Vec<String> = Vec::new();
    let mut accs: HashMap<String, Acc> = HashMap::new();
    for m in explode_memberships(rows) {
        let acc = accs.entry(m.label.clone()).or_insert_with(|| {
            order.push(m.label.clone());
            Acc {
                count: 0,
                quality_sum: 0.0,
                reach_sum: 0.0,
            }
        });
        acc.count += 1;
        acc.quality_sum += m.quality;
        acc.reach_sum += m.reach;
    }

    order
        .into_iter()
        .filter_map(|label| {
            let acc = accs.remove(&label)?;
            (acc.count >= MIN_CATEGORY_COUNT).then(|| CategoryAggregate {
                avg_quality: acc.quality_sum / f64::from(acc.count),
                total_reach: acc.reach_sum,
                count: acc.count,
                label,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/data/aggregate.rs"]
mod tests;
