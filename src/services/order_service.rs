use crate::entities::{orders, prelude::*};
use crate::services::error::ServiceError;
use crate::utils::status::{ClosingTerms, INITIAL_STATUS};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedOrder {
    pub id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: i32,
    pub status: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderDetail {
    pub id: i32,
    pub status: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Whether the current status is one of the closing terms
    pub is_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusChange {
    pub id: i32,
    pub new_status: String,
}

/// Optional window over the id-descending order list
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl From<orders::Model> for OrderSummary {
    fn from(m: orders::Model) -> Self {
        Self {
            id: m.id,
            status: m.status,
            comment: m.comment.unwrap_or_default(),
            created_at: m.created_at,
        }
    }
}

pub struct OrderService {
    db: DatabaseConnection,
    closing_terms: ClosingTerms,
}

impl OrderService {
    pub fn new(db: DatabaseConnection, closing_terms: ClosingTerms) -> Self {
        Self { db, closing_terms }
    }

    pub fn closing_terms(&self) -> &ClosingTerms {
        &self.closing_terms
    }

    pub async fn create_order(&self, comment: &str) -> Result<CreatedOrder, ServiceError> {
        let order = orders::ActiveModel {
            id: NotSet,
            user_id: Set(None),
            status: Set(INITIAL_STATUS.to_string()),
            comment: Set(Some(comment.to_string())),
            created_at: Set(Utc::now()),
            closed_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        tracing::info!("📝 Order {} created", order.id);

        Ok(CreatedOrder {
            id: order.id,
            created_at: order.created_at,
        })
    }

    pub async fn list_orders(&self, page: Page) -> Result<Vec<OrderSummary>, ServiceError> {
        let mut query = Orders::find().order_by_desc(orders::Column::Id);
        if let Some(offset) = page.offset {
            // SQLite rejects OFFSET without LIMIT
            query = query
                .limit(page.limit.unwrap_or(i64::MAX as u64))
                .offset(offset);
        } else if let Some(limit) = page.limit {
            query = query.limit(limit);
        }

        let rows = query.all(&self.db).await?;
        Ok(rows.into_iter().map(OrderSummary::from).collect())
    }

    pub async fn get_order(&self, id: i32) -> Result<OrderDetail, ServiceError> {
        let order = self.find(id).await?;
        let is_closed = self.closing_terms.is_closing(&order.status);

        Ok(OrderDetail {
            id: order.id,
            status: order.status,
            comment: order.comment.unwrap_or_default(),
            created_at: order.created_at,
            closed_at: order.closed_at,
            is_closed,
        })
    }

    /// Overwrites the status. A closing status also stamps `closed_at` with
    /// the current time, replacing any earlier value; other statuses leave
    /// `closed_at` as stored. Last writer wins.
    pub async fn update_status(
        &self,
        id: i32,
        new_status: &str,
    ) -> Result<StatusChange, ServiceError> {
        let order = self.find(id).await?;
        let closing = self.closing_terms.is_closing(new_status);

        let mut active: orders::ActiveModel = order.into();
        active.status = Set(new_status.to_string());
        if closing {
            active.closed_at = Set(Some(Utc::now()));
        }
        active.update(&self.db).await?;

        if closing {
            tracing::info!("🏁 Order {} closed with status '{}'", id, new_status);
        } else {
            tracing::info!("🔁 Order {} status set to '{}'", id, new_status);
        }

        Ok(StatusChange {
            id,
            new_status: new_status.to_string(),
        })
    }

    async fn find(&self, id: i32) -> Result<orders::Model, ServiceError> {
        Orders::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::order_not_found(id))
    }
}
