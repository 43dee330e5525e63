//! Aggregation behavior observed through the ingest path.

use std::sync::Arc;

use analytics_service::{
    application::{aggregate_store::AggregateStore, ingest_service::IngestService},
    domain::events::Topic,
    infrastructure::metrics::EventMetrics,
};

fn ingest() -> IngestService {
    IngestService::new(
        Arc::new(AggregateStore::new()),
        EventMetrics::new().expect("metrics registry"),
    )
}

fn user_registered(id: usize) -> Vec<u8> {
    format!(
        r#"{{"type":"user-registered","userId":"u{id}","email":"u{id}@example.com","timestamp":"2024-05-01T10:00:00Z"}}"#
    )
    .into_bytes()
}

fn order_placed(id: usize, total: f64) -> Vec<u8> {
    format!(
        r#"{{"type":"order-placed","orderId":"o{id}","userId":"u{id}","total":{total},"timestamp":"2024-05-01T10:00:00Z"}}"#
    )
    .into_bytes()
}

#[test]
fn interleaved_users_and_orders_add_up() {
    let service = ingest();
    let totals = [12.5, 7.25, 100.0, 0.25];

    for (i, total) in totals.iter().enumerate() {
        service.process(Topic::User, &user_registered(i)).unwrap();
        service.process(Topic::Order, &order_placed(i, *total)).unwrap();
    }
    service.process(Topic::User, &user_registered(99)).unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.total_users, 5);
    assert_eq!(snapshot.total_orders, 4);
    assert_eq!(snapshot.events_processed, 9);
    assert!((snapshot.total_revenue - totals.iter().sum::<f64>()).abs() < 1e-9);
}

#[test]
fn malformed_payloads_only_bump_processed_count() {
    let service = ingest();
    service.process(Topic::Order, &order_placed(1, 5.0)).unwrap();
    let before = service.snapshot();

    for (topic, payload) in [
        (Topic::User, b"not json".as_slice()),
        (Topic::Order, br#"{"type":"order-placed","total":"#.as_slice()),
        (Topic::Order, br#"{"type":"order-placed","total":"ten"}"#.as_slice()),
    ] {
        assert!(service.process(topic, payload).is_err());
    }

    let after = service.snapshot();
    assert_eq!(after.events_processed, before.events_processed + 3);
    assert_eq!(after.total_users, before.total_users);
    assert_eq!(after.total_orders, before.total_orders);
    assert_eq!(after.total_revenue, before.total_revenue);
    assert_eq!(after.last_updated, before.last_updated);
}

#[test]
fn last_updated_is_monotonic() {
    let service = ingest();
    let mut previous = service.snapshot().last_updated;

    for payload in [
        user_registered(1),
        br#"{"type":"user-updated","userId":"u1"}"#.to_vec(),
        b"{}".to_vec(),
    ] {
        service.process(Topic::User, &payload).unwrap();
        let current = service.snapshot().last_updated;
        assert!(current >= previous);
        previous = current;
    }
}

#[test]
fn two_orders_sum_their_totals() {
    let service = ingest();

    service
        .process(
            Topic::Order,
            br#"{"type":"order-placed","orderId":"o1","userId":"u1","total":49.99,"timestamp":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
    service
        .process(
            Topic::Order,
            br#"{"type":"order-placed","orderId":"o2","userId":"u2","total":10.01,"timestamp":"2024-05-01T10:01:00Z"}"#,
        )
        .unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.total_orders, 2);
    assert!((snapshot.total_revenue - 60.00).abs() < 1e-9);
}

#[test]
fn null_valued_fields_do_not_drop_events() {
    let service = ingest();

    service
        .process(
            Topic::User,
            br#"{"type":"user-registered","userId":"u1","email":null,"timestamp":null}"#,
        )
        .unwrap();
    service
        .process(
            Topic::Order,
            br#"{"type":"order-placed","orderId":"o1","userId":null,"total":5.0}"#,
        )
        .unwrap();
    service
        .process(Topic::Order, br#"{"Type":"order-placed","Total":2.5}"#)
        .unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.total_users, 1);
    assert_eq!(snapshot.total_orders, 2);
    assert_eq!(snapshot.total_revenue, 7.5);
    assert_eq!(snapshot.events_processed, 3);
}

#[test]
fn non_json_user_payload_is_counted_but_ignored() {
    let service = ingest();

    assert!(service.process(Topic::User, b"\xff\xfe binary").is_err());

    let snapshot = service.snapshot();
    assert_eq!(snapshot.events_processed, 1);
    assert_eq!(snapshot.total_users, 0);
}

#[test]
fn replaying_an_event_counts_it_twice() {
    let service = ingest();
    let payload = order_placed(7, 20.0);

    service.process(Topic::Order, &payload).unwrap();
    service.process(Topic::Order, &payload).unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.total_orders, 2);
    assert_eq!(snapshot.total_revenue, 40.0);
    assert_eq!(snapshot.events_processed, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_burst_loses_no_updates() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 250;

    let service = Arc::new(ingest());

    let tasks = (0..PRODUCERS).map(|producer| {
        let service = service.clone();
        tokio::spawn(async move {
            for i in 0..PER_PRODUCER {
                if (producer + i) % 2 == 0 {
                    service.process(Topic::User, &user_registered(i)).unwrap();
                } else {
                    service.process(Topic::Order, &order_placed(i, 1.0)).unwrap();
                }
            }
        })
    });
    for result in futures::future::join_all(tasks).await {
        result.unwrap();
    }

    let snapshot = service.snapshot();
    let total = (PRODUCERS * PER_PRODUCER) as i64;
    assert_eq!(snapshot.events_processed, total);
    assert_eq!(snapshot.total_users + snapshot.total_orders, total);
    assert_eq!(snapshot.total_revenue, snapshot.total_orders as f64);
}
