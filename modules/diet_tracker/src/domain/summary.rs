use crate::contract::model::{DietSummary, Feed};

/// Fold a session's feeds into a [`DietSummary`] in a single pass.
///
/// Inside-diet feeds are bucketed by the UTC calendar day of `date`.
pub fn summarize(feeds: &[Feed]) -> DietSummary {
    feeds.iter().fold(DietSummary::default(), |mut acc, feed| {
        acc.total += 1;
        match feed.is_on_diet {
            Some(true) => {
                acc.inside_diet += 1;
                *acc.diet_by_day.entry(feed.date.date_naive()).or_insert(0) += 1;
            }
            Some(false) => acc.outside_diet += 1,
            None => {}
        }
        acc
    })
}
