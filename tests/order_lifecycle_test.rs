mod common;

use common::setup_test_db;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use utilization_backend::services::error::ServiceError;
use utilization_backend::services::order_service::{OrderService, Page};
use utilization_backend::utils::status::ClosingTerms;

async fn service() -> (OrderService, DatabaseConnection) {
    let db = setup_test_db().await;
    (OrderService::new(db.clone(), ClosingTerms::default()), db)
}

#[tokio::test]
async fn test_new_order_starts_open() {
    let (orders, _db) = service().await;

    let created = orders.create_order("call before arrival").await.unwrap();
    let order = orders.get_order(created.id).await.unwrap();

    assert_eq!(order.status, "New");
    assert_eq!(order.comment, "call before arrival");
    assert_eq!(order.created_at, created.created_at);
    assert!(order.closed_at.is_none());
    assert!(!order.is_closed);
}

#[tokio::test]
async fn test_comment_is_not_length_limited() {
    let (orders, _db) = service().await;

    let long_comment = "мусор ".repeat(5_000);
    let created = orders.create_order(&long_comment).await.unwrap();

    assert_eq!(orders.get_order(created.id).await.unwrap().comment, long_comment);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let (orders, _db) = service().await;
    orders.create_order("exists").await.unwrap();

    assert!(matches!(
        orders.get_order(999).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        orders.update_status(999, "completed").await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_orders_newest_first_and_stable() {
    let (orders, _db) = service().await;
    for i in 0..4 {
        orders.create_order(&format!("order {}", i)).await.unwrap();
    }

    let first = orders.list_orders(Page::default()).await.unwrap();
    let second = orders.list_orders(Page::default()).await.unwrap();

    let ids: Vec<i32> = first.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
    assert_eq!(first, second);
    assert!(first.iter().all(|o| o.status == "New"));
}

#[tokio::test]
async fn test_list_orders_pagination() {
    let (orders, _db) = service().await;
    for i in 0..5 {
        orders.create_order(&format!("order {}", i)).await.unwrap();
    }

    let page = orders
        .list_orders(Page {
            limit: Some(2),
            offset: Some(1),
        })
        .await
        .unwrap();
    let ids: Vec<i32> = page.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![4, 3]);

    let tail = orders
        .list_orders(Page {
            limit: None,
            offset: Some(3),
        })
        .await
        .unwrap();
    let ids: Vec<i32> = tail.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_closing_status_sets_closed_at_and_keeps_case() {
    let (orders, _db) = service().await;

    for status in ["completed", "COMPLETED", "Closed", "finished"] {
        let created = orders.create_order("x").await.unwrap();
        let change = orders.update_status(created.id, status).await.unwrap();
        assert_eq!(change.id, created.id);
        assert_eq!(change.new_status, status);

        let order = orders.get_order(created.id).await.unwrap();
        assert_eq!(order.status, status);
        assert!(order.closed_at.is_some(), "closed_at not set for {}", status);
        assert!(order.is_closed);
    }
}

#[tokio::test]
async fn test_non_closing_status_leaves_closed_at() {
    let (orders, _db) = service().await;

    let open = orders.create_order("open").await.unwrap();
    orders.update_status(open.id, "in review").await.unwrap();
    let order = orders.get_order(open.id).await.unwrap();
    assert_eq!(order.status, "in review");
    assert!(order.closed_at.is_none());

    let closed = orders.create_order("closed").await.unwrap();
    orders.update_status(closed.id, "completed").await.unwrap();
    let closed_at = orders.get_order(closed.id).await.unwrap().closed_at;
    assert!(closed_at.is_some());

    orders.update_status(closed.id, "in review").await.unwrap();
    let order = orders.get_order(closed.id).await.unwrap();
    assert_eq!(order.status, "in review");
    assert_eq!(order.closed_at, closed_at);
    assert!(!order.is_closed);
}

#[tokio::test]
async fn test_repeated_closing_overwrites_closed_at() {
    let (orders, _db) = service().await;

    let created = orders.create_order("x").await.unwrap();
    orders.update_status(created.id, "closed").await.unwrap();
    let first = orders.get_order(created.id).await.unwrap().closed_at.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    orders.update_status(created.id, "Finished").await.unwrap();
    let second = orders.get_order(created.id).await.unwrap().closed_at.unwrap();

    assert!(second > first);
}

#[tokio::test]
async fn test_custom_closing_terms() {
    let db = setup_test_db().await;
    let orders = OrderService::new(db, ClosingTerms::new(["Закрыта"]));

    let created = orders.create_order("x").await.unwrap();
    orders.update_status(created.id, "completed").await.unwrap();
    assert!(orders.get_order(created.id).await.unwrap().closed_at.is_none());

    orders.update_status(created.id, "закрыта").await.unwrap();
    assert!(orders.get_order(created.id).await.unwrap().closed_at.is_some());
}

#[tokio::test]
async fn test_database_failure_is_storage_unavailable() {
    let (orders, db) = service().await;
    let created = orders.create_order("before").await.unwrap();

    db.execute_unprepared("DROP TABLE files").await.unwrap();
    db.execute_unprepared("DROP TABLE orders").await.unwrap();

    let err = orders.create_order("after").await.unwrap_err();
    assert!(matches!(err, ServiceError::StorageUnavailable(_)));
    assert_eq!(err.code(), "STORAGE_UNAVAILABLE");

    assert!(matches!(
        orders.get_order(created.id).await,
        Err(ServiceError::StorageUnavailable(_))
    ));
    assert!(matches!(
        orders.list_orders(Page::default()).await,
        Err(ServiceError::StorageUnavailable(_))
    ));
}
