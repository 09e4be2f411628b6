// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! sled-backed business directory and analytics log

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::analytics::{AnalyticsRecord, FeedbackRecord};
use crate::domain::business::{BusinessProduct, BusinessQuery};
use crate::domain::repository::{newest_first, AnalyticsLog, BusinessDirectory, RepositoryError};

const BUSINESS_TREE: &str = "business_products";
const ANALYTICS_TREE: &str = "analytics";
const FEEDBACK_TREE: &str = "feedback";

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, RepositoryError> {
    Ok(serde_json::to_vec(value)?)
}

fn decode_all<T: DeserializeOwned>(tree: &sled::Tree) -> Result<Vec<T>, RepositoryError> {
    tree.iter()
        .values()
        .map(|value| -> Result<T, RepositoryError> { Ok(serde_json::from_slice(&value?)?) })
        .collect()
}

/// Listings keyed by product id
#[derive(Clone)]
pub struct SledBusinessDirectory {
    tree: sled::Tree,
}

impl SledBusinessDirectory {
    pub fn from_db(db: &sled::Db) -> Result<Self, RepositoryError> {
        Ok(Self {
            tree: db.open_tree(BUSINESS_TREE)?,
        })
    }
}

#[async_trait]
impl BusinessDirectory for SledBusinessDirectory {
    async fn add(&self, product: BusinessProduct) -> Result<(), RepositoryError> {
        self.tree.insert(product.id.0.as_bytes(), encode(&product)?)?;
        Ok(())
    }

    async fn search(&self, query: &BusinessQuery) -> Result<Vec<BusinessProduct>, RepositoryError> {
        let matches = decode_all::<BusinessProduct>(&self.tree)?
            .into_iter()
            .filter(|p| query.matches(p))
            .collect();
        Ok(newest_first(matches, query.limit))
    }

    async fn list_by_business(&self, email: &str) -> Result<Vec<BusinessProduct>, RepositoryError> {
        let email = email.trim().to_lowercase();
        let owned = decode_all::<BusinessProduct>(&self.tree)?
            .into_iter()
            .filter(|p| p.active && p.business_email == email)
            .collect();
        Ok(newest_first(owned, usize::MAX))
    }
}

/// Append-only log; keys come from `Db::generate_id`, so iteration order is
/// insertion order
#[derive(Clone)]
pub struct SledAnalyticsLog {
    db: sled::Db,
    records: sled::Tree,
    feedback: sled::Tree,
}

impl SledAnalyticsLog {
    pub fn from_db(db: &sled::Db) -> Result<Self, RepositoryError> {
        Ok(Self {
            db: db.clone(),
            records: db.open_tree(ANALYTICS_TREE)?,
            feedback: db.open_tree(FEEDBACK_TREE)?,
        })
    }

    fn append_to<T: Serialize>(&self, tree: &sled::Tree, value: &T) -> Result<(), RepositoryError> {
        let key = self.db.generate_id()?.to_be_bytes();
        tree.insert(key, encode(value)?)?;
        Ok(())
    }
}

#[async_trait]
impl AnalyticsLog for SledAnalyticsLog {
    async fn append(&self, record: AnalyticsRecord) -> Result<(), RepositoryError> {
        self.append_to(&self.records, &record)
    }

    async fn append_feedback(&self, record: FeedbackRecord) -> Result<(), RepositoryError> {
        self.append_to(&self.feedback, &record)
    }

    async fn records_since(&self, since: DateTime<Utc>) -> Result<Vec<AnalyticsRecord>, RepositoryError> {
        Ok(decode_all::<AnalyticsRecord>(&self.records)?
            .into_iter()
            .filter(|r| r.timestamp >= since)
            .collect())
    }

    async fn feedback_since(&self, since: DateTime<Utc>) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        Ok(decode_all::<FeedbackRecord>(&self.feedback)?
            .into_iter()
            .filter(|f| f.timestamp >= since)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::FeedbackKind;
    use crate::domain::business::NewBusinessProduct;
    use crate::domain::candidate::StrategyId;
    use crate::domain::price::Price;
    use chrono::Duration;
    use uuid::Uuid;

    fn record(strategy: StrategyId, age_days: i64) -> AnalyticsRecord {
        AnalyticsRecord {
            id: Uuid::new_v4(),
            request_text: "relax".into(),
            emotion: "stressed".into(),
            strategy,
            candidate_count: 3,
            latency_ms: 12,
            success: true,
            timestamp: Utc::now() - Duration::days(age_days),
        }
    }

    #[tokio::test]
    async fn test_analytics_survive_reopen_in_order() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = sled::open(dir.path()).unwrap();
            let log = SledAnalyticsLog::from_db(&db).unwrap();
            log.append(record(StrategyId::LocalBusiness, 0)).await.unwrap();
            log.append(record(StrategyId::WebSearch, 0)).await.unwrap();
            log.append(record(StrategyId::Fallback, 40)).await.unwrap();
            log.append_feedback(FeedbackRecord {
                id: Uuid::new_v4(),
                request_text: "relax".into(),
                emotion: "stressed".into(),
                product_name: "Candle".into(),
                kind: FeedbackKind::Good,
                strategy: Some(StrategyId::WebSearch),
                timestamp: Utc::now(),
            })
            .await
            .unwrap();
        }

        let db = sled::open(dir.path()).unwrap();
        let log = SledAnalyticsLog::from_db(&db).unwrap();
        let recent = log.records_since(Utc::now() - Duration::days(7)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].strategy, StrategyId::LocalBusiness);
        assert_eq!(recent[1].strategy, StrategyId::WebSearch);
        assert_eq!(
            log.feedback_since(Utc::now() - Duration::days(1)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_business_directory_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        let directory = SledBusinessDirectory::from_db(&db).unwrap();
        directory
            .add(BusinessProduct::register(NewBusinessProduct {
                business_name: "Chai Corner".into(),
                business_email: "owner@chai.in".into(),
                name: "Masala Chai Tin".into(),
                description: "Spiced tea".into(),
                price: Price::inr(350.0).unwrap(),
                category: "groceries".into(),
                target_emotions: vec!["tired".into()],
                stock: 5,
            }))
            .await
            .unwrap();

        let query = BusinessQuery {
            emotion: "tired".into(),
            terms: vec!["chai".into()],
            limit: 6,
        };
        assert_eq!(directory.search(&query).await.unwrap().len(), 1);
        assert_eq!(directory.list_by_business("owner@chai.in").await.unwrap().len(), 1);
    }
}
