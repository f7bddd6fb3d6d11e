//! Integration tests: store writes → PickupPointTreeView listing.

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{
    City, PickupPoint, PickupPointId, Product, ProductId, ProductType, Reception, ReceptionId,
    ReceptionStatus,
};
use projections::{ListPoints, PageLimits, PickupPointTreeView};
use storage::{InMemoryStore, Store, StoreTx};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()
}

async fn add_point(store: &InMemoryStore, city: City) -> PickupPoint {
    let point = PickupPoint {
        id: PickupPointId::new(),
        registration_date: base(),
        city,
    };
    store.insert_pickup_point(&point).await.unwrap();
    point
}

/// Adds a closed reception opened at `base + offset_hours` with the given products.
async fn add_reception(
    store: &InMemoryStore,
    point: &PickupPoint,
    offset_hours: i64,
    products: &[ProductType],
) -> (Reception, Vec<Product>) {
    let reception = Reception {
        id: ReceptionId::new(),
        date_time: base() + Duration::hours(offset_hours),
        pvz_id: point.id,
        status: ReceptionStatus::Closed,
    };
    let products: Vec<Product> = products
        .iter()
        .enumerate()
        .map(|(i, product_type)| Product {
            id: ProductId::new(),
            date_time: reception.date_time + Duration::minutes(i as i64),
            product_type: *product_type,
            reception_id: reception.id,
        })
        .collect();

    let mut tx = store.begin().await.unwrap();
    tx.insert_reception(&reception).await.unwrap();
    for product in &products {
        tx.insert_product(product).await.unwrap();
    }
    tx.commit().await.unwrap();

    (reception, products)
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let view = PickupPointTreeView::new(InMemoryStore::new());
    let trees = view.list(&ListPoints::new()).await.unwrap();
    assert!(trees.is_empty());
}

#[tokio::test]
async fn test_receptions_and_products_are_ascending() {
    let store = InMemoryStore::new();
    let point = add_point(&store, City::Kazan).await;
    // Inserted out of order on purpose.
    let (late, _) = add_reception(&store, &point, 5, &[ProductType::Shoes]).await;
    let (early, early_products) = add_reception(
        &store,
        &point,
        1,
        &[ProductType::Electronics, ProductType::Clothes],
    )
    .await;

    let view = PickupPointTreeView::new(store);
    let trees = view.list(&ListPoints::new()).await.unwrap();

    assert_eq!(trees.len(), 1);
    let receptions = &trees[0].receptions;
    assert_eq!(receptions[0].reception.id, early.id);
    assert_eq!(receptions[1].reception.id, late.id);
    assert_eq!(receptions[0].products, early_products);
}

#[tokio::test]
async fn test_limit_ten_returns_at_most_ten_points() {
    let store = InMemoryStore::new();
    for _ in 0..12 {
        let point = add_point(&store, City::Moscow).await;
        add_reception(&store, &point, 0, &[ProductType::Clothes, ProductType::Shoes]).await;
    }

    let view = PickupPointTreeView::new(store);
    let first = view
        .list(&ListPoints::new().page(1).limit(10))
        .await
        .unwrap();
    let second = view
        .list(&ListPoints::new().page(2).limit(10))
        .await
        .unwrap();

    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 2);
    assert!(first.iter().all(|t| t.receptions[0].products.len() == 2));

    let mut ids: Vec<_> = first.iter().chain(&second).map(|t| t.pvz.id).collect();
    let before = ids.clone();
    ids.sort();
    assert_eq!(ids, before, "pages follow pickup point id order");
    ids.dedup();
    assert_eq!(ids.len(), 12, "no point appears on two pages");
}

#[tokio::test]
async fn test_oversized_limit_falls_back_to_default() {
    let store = InMemoryStore::new();
    for _ in 0..15 {
        add_point(&store, City::Moscow).await;
    }

    let view = PickupPointTreeView::new(store);
    let trees = view.list(&ListPoints::new().limit(100)).await.unwrap();
    assert_eq!(trees.len(), PageLimits::DEFAULT_LIMIT as usize);
}

#[tokio::test]
async fn test_date_range_filters_receptions() {
    let store = InMemoryStore::new();
    let point = add_point(&store, City::Moscow).await;
    let quiet = add_point(&store, City::SaintPetersburg).await;
    add_reception(&store, &point, 0, &[ProductType::Shoes]).await;
    let (inside, _) = add_reception(&store, &point, 24, &[ProductType::Clothes]).await;
    add_reception(&store, &quiet, 72, &[]).await;

    let view = PickupPointTreeView::new(store);
    let request = ListPoints::new()
        .start_date(base() + Duration::hours(12))
        .end_date(base() + Duration::hours(36));
    let trees = view.list(&request).await.unwrap();

    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].pvz.id, point.id);
    assert_eq!(trees[0].receptions.len(), 1);
    assert_eq!(trees[0].receptions[0].reception.id, inside.id);
}

#[tokio::test]
async fn test_points_without_receptions_listed_without_filter() {
    let store = InMemoryStore::new();
    let point = add_point(&store, City::Moscow).await;

    let view = PickupPointTreeView::new(store);
    let trees = view.list(&ListPoints::new()).await.unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].pvz, point);
    assert!(trees[0].receptions.is_empty());

    let filtered = view
        .list(&ListPoints::new().start_date(base()))
        .await
        .unwrap();
    assert!(filtered.is_empty());
}

#[tokio::test]
async fn test_custom_limits() {
    let store = InMemoryStore::new();
    for _ in 0..6 {
        add_point(&store, City::Moscow).await;
    }

    let view = PickupPointTreeView::with_limits(store, PageLimits::new(4, 5));
    assert_eq!(view.list(&ListPoints::new()).await.unwrap().len(), 4);
    assert_eq!(
        view.list(&ListPoints::new().limit(5)).await.unwrap().len(),
        5
    );
    assert_eq!(
        view.list(&ListPoints::new().limit(6)).await.unwrap().len(),
        4
    );
}
