use async_trait::async_trait;

use crate::{types::Update, Result};

/// Where the polling loop gets its batches from.
///
/// `offset` is the next id not yet acknowledged; `None` asks for everything
/// pending. Implementations return the batch sorted by id and handle their
/// own retry of transient failures.
#[async_trait]
pub trait UpdateSource: Send + Sync + 'static {
    async fn fetch_updates(&self, offset: Option<i64>) -> Result<Vec<Update>>;
}

/// Ascending by id. The remote does not promise an order within a batch.
pub fn sort_updates(updates: &mut [Update]) {
    updates.sort_by_key(|u| u.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_orders_by_id() {
        let mut batch: Vec<Update> = [5, 3, 7]
            .into_iter()
            .map(|id| Update {
                id,
                ..Default::default()
            })
            .collect();
        sort_updates(&mut batch);
        let ids: Vec<i64> = batch.iter().map(|u| u.id).collect();
        assert_eq!(ids, [3, 5, 7]);
    }
}
