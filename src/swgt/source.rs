//! Defense data sources.

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use super::catalog;
use super::models::{Defense, DefenseQuery, Monster, MonsterCounter, TrendingDefense, VoteDirection};
use crate::error::Result;

/// Remote collaborator answering swgt lookups. Every call may fail; the
/// client decides what to serve instead.
#[async_trait]
pub trait DefenseSource: Send + Sync + fmt::Debug {
    /// Short name used in logs and `/health`.
    fn name(&self) -> &'static str;

    async fn search_defenses(&self, query: &DefenseQuery) -> Result<Vec<Defense>>;

    async fn search_monsters(&self, query: &str) -> Result<Vec<Monster>>;

    async fn trending(&self) -> Result<Vec<TrendingDefense>>;

    async fn monster_counters(&self, name: &str) -> Result<Vec<MonsterCounter>>;

    async fn vote(&self, counter_id: &str, direction: VoteDirection) -> Result<()>;

    /// Whether the remote answers at all.
    async fn check_health(&self) -> bool;
}

// == Mock Source ==
/// Answers from the bundled catalog. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

#[async_trait]
impl DefenseSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search_defenses(&self, query: &DefenseQuery) -> Result<Vec<Defense>> {
        Ok(catalog::search_defenses(query.monsters()))
    }

    async fn search_monsters(&self, query: &str) -> Result<Vec<Monster>> {
        Ok(catalog::search_monsters(query))
    }

    async fn trending(&self) -> Result<Vec<TrendingDefense>> {
        Ok(catalog::trending_defenses())
    }

    async fn monster_counters(&self, name: &str) -> Result<Vec<MonsterCounter>> {
        Ok(catalog::monster_counters(name))
    }

    async fn vote(&self, counter_id: &str, direction: VoteDirection) -> Result<()> {
        debug!(counter_id, direction = %direction, "Mock vote accepted");
        Ok(())
    }

    async fn check_health(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_search_defenses() {
        let query = DefenseQuery::new("Susano", "Garo", "Orion").unwrap();
        let defenses = MockSource.search_defenses(&query).await.unwrap();
        assert_eq!(defenses.len(), 1);

        let query = DefenseQuery::new("Lushen", "Garo", "Orion").unwrap();
        assert!(MockSource.search_defenses(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_source_vote_accepts() {
        assert!(MockSource.vote("counter-1", VoteDirection::Up).await.is_ok());
    }
}
