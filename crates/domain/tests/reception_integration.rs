//! Integration tests for the reception lifecycle.
//!
//! These tests drive `ReceptionService` and `PickupPointRegistry` together
//! over the in-memory store, including concurrent opens on one point.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use common::{City, ManualClock, PickupPointId, ProductType, ReceptionStatus};
use domain::{DomainError, PickupPointRegistry, ReceptionError, ReceptionService};
use futures_util::future::join_all;
use projections::{ListPoints, PageLimits};
use storage::InMemoryStore;

struct Harness {
    registry: PickupPointRegistry<InMemoryStore>,
    receptions: ReceptionService<InMemoryStore>,
    clock: Arc<ManualClock>,
}

/// Helper wiring both services to one store and a manual clock.
fn harness() -> Harness {
    let store = InMemoryStore::new();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap(),
    ));
    Harness {
        registry: PickupPointRegistry::with_settings(
            store.clone(),
            PageLimits::default(),
            clock.clone(),
        ),
        receptions: ReceptionService::with_clock(store, clock.clone()),
        clock,
    }
}

fn rule(err: DomainError) -> ReceptionError {
    err.as_reception()
        .cloned()
        .unwrap_or_else(|| panic!("expected a reception rule violation, got {err:?}"))
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn remove_then_close_shows_remaining_products() {
        let h = harness();
        let point = h.registry.create_point(City::Kazan).await.unwrap();

        let reception = h.receptions.open_reception(point.id).await.unwrap();
        let mut scanned = Vec::new();
        for product_type in [
            ProductType::Electronics,
            ProductType::Clothes,
            ProductType::Shoes,
        ] {
            h.clock.advance(Duration::seconds(1));
            scanned.push(
                h.receptions
                    .scan_product(product_type, point.id)
                    .await
                    .unwrap(),
            );
        }

        h.receptions.remove_last_product(point.id).await.unwrap();
        let closed = h.receptions.close_reception(point.id).await.unwrap();
        assert_eq!(closed.id, reception.id);
        assert_eq!(closed.status, ReceptionStatus::Closed);

        let trees = h.registry.list_points(&ListPoints::new()).await.unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].pvz, point);
        assert_eq!(trees[0].receptions.len(), 1);

        let listed = &trees[0].receptions[0];
        assert_eq!(listed.reception.status, ReceptionStatus::Closed);
        assert_eq!(listed.products, scanned[..2].to_vec());
    }

    #[tokio::test]
    async fn open_twice_leaves_one_reception() {
        let h = harness();
        let point = h.registry.create_point(City::Moscow).await.unwrap();

        h.receptions.open_reception(point.id).await.unwrap();
        let err = h.receptions.open_reception(point.id).await.unwrap_err();

        assert_eq!(rule(err), ReceptionError::ReceptionAlreadyOpen(point.id));
        let trees = h.registry.list_points(&ListPoints::new()).await.unwrap();
        assert_eq!(trees[0].receptions.len(), 1);
    }

    #[tokio::test]
    async fn removing_past_empty_reports_no_products() {
        let h = harness();
        let point = h.registry.create_point(City::Moscow).await.unwrap();
        let reception = h.receptions.open_reception(point.id).await.unwrap();

        for _ in 0..4 {
            h.receptions
                .scan_product(ProductType::Clothes, point.id)
                .await
                .unwrap();
        }
        for _ in 0..4 {
            h.receptions.remove_last_product(point.id).await.unwrap();
        }

        let err = h.receptions.remove_last_product(point.id).await.unwrap_err();
        assert_eq!(rule(err), ReceptionError::NoProductsInReception(reception.id));
    }

    #[tokio::test]
    async fn close_twice_then_already_closed() {
        let h = harness();
        let point = h.registry.create_point(City::SaintPetersburg).await.unwrap();
        h.receptions.open_reception(point.id).await.unwrap();

        h.receptions.close_reception(point.id).await.unwrap();
        let err = h.receptions.close_reception(point.id).await.unwrap_err();
        assert_eq!(rule(err), ReceptionError::ReceptionAlreadyClosed(point.id));
    }

    #[tokio::test]
    async fn close_on_fresh_point_reports_already_closed() {
        let h = harness();
        let point = h.registry.create_point(City::Kazan).await.unwrap();

        let err = h.receptions.close_reception(point.id).await.unwrap_err();
        assert_eq!(rule(err), ReceptionError::ReceptionAlreadyClosed(point.id));
    }
}

mod rule_violations {
    use super::*;

    #[tokio::test]
    async fn product_operations_without_open_reception() {
        let h = harness();
        let point = h.registry.create_point(City::Moscow).await.unwrap();

        let err = h
            .receptions
            .scan_product(ProductType::Electronics, point.id)
            .await
            .unwrap_err();
        assert_eq!(rule(err), ReceptionError::NoOpenReception(point.id));

        let err = h.receptions.remove_last_product(point.id).await.unwrap_err();
        assert_eq!(rule(err), ReceptionError::NoOpenReception(point.id));
    }

    #[tokio::test]
    async fn unknown_point_is_not_found() {
        let h = harness();
        let ghost = PickupPointId::new();

        let err = h.receptions.open_reception(ghost).await.unwrap_err();
        assert_eq!(rule(err), ReceptionError::PickupPointNotFound(ghost));
        assert_eq!(h.receptions.store().product_count().await, 0);
    }

    #[tokio::test]
    async fn failed_scan_after_close_adds_nothing() {
        let h = harness();
        let point = h.registry.create_point(City::Moscow).await.unwrap();
        h.receptions.open_reception(point.id).await.unwrap();
        h.receptions
            .scan_product(ProductType::Shoes, point.id)
            .await
            .unwrap();
        h.receptions.close_reception(point.id).await.unwrap();

        h.receptions
            .scan_product(ProductType::Shoes, point.id)
            .await
            .unwrap_err();
        assert_eq!(h.receptions.store().product_count().await, 1);
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn concurrent_opens_admit_exactly_one() {
        let h = harness();
        let point = h.registry.create_point(City::Kazan).await.unwrap();

        let results = join_all((0..16).map(|_| h.receptions.open_reception(point.id))).await;

        let opened = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(opened, 1);
        for result in results.into_iter().filter(Result::is_err) {
            let err = result.unwrap_err();
            assert_eq!(rule(err), ReceptionError::ReceptionAlreadyOpen(point.id));
        }

        let receptions = h.receptions.store().receptions_for(point.id).await;
        assert_eq!(receptions.len(), 1);
        assert_eq!(receptions[0].status, ReceptionStatus::InProgress);
    }

    #[tokio::test]
    async fn concurrent_scans_all_land_in_the_open_reception() {
        let h = harness();
        let point = h.registry.create_point(City::Moscow).await.unwrap();
        let reception = h.receptions.open_reception(point.id).await.unwrap();

        let results = join_all(
            (0..10).map(|_| h.receptions.scan_product(ProductType::Clothes, point.id)),
        )
        .await;

        assert!(results.iter().all(Result::is_ok));
        assert!(
            results
                .into_iter()
                .all(|r| r.unwrap().reception_id == reception.id)
        );
        assert_eq!(h.receptions.store().product_count().await, 10);
    }
}
