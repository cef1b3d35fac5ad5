//! End-to-end order batch construction tests.

use serde_json::json;

use kerviel::batch::{OrderBatchList, ParamMap};
use kerviel::error::KervielError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_bracket_batch_builds_three_validated_legs() {
    init_tracing();
    let mut batch = OrderBatchList::new("XBTUSD");

    batch.add_limit_order("buy", 0.5, 29000.0).unwrap();
    batch
        .add_stop_loss_order("sell", 0.5, 28000.0, "last")
        .unwrap();
    batch
        .add_take_profit_limit_order("sell", 0.5, 31000.0, 150.5, "index", "+")
        .unwrap();

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.pair(), "XBTUSD");

    let stop = &batch.legs()[1];
    assert_eq!(stop.get("ordertype"), Some(&json!("stop-loss")));
    assert_eq!(stop.get("trigger"), Some(&json!("last")));
    assert_eq!(stop.get("volume"), Some(&json!("0.50000000")));

    let take = &batch.legs()[2];
    assert_eq!(take.get("ordertype"), Some(&json!("take-profit-limit")));
    assert_eq!(take.get("price2"), Some(&json!("+150.5")));
}

#[test]
fn test_failed_leg_is_not_appended_and_batch_stays_usable() {
    init_tracing();
    let mut batch = OrderBatchList::new("XBTUSD");

    let err = batch
        .add_stop_loss_order("sell", 1.0, 19000.0, "bogus")
        .unwrap_err();
    assert!(matches!(err, KervielError::Validation(_)));
    assert!(batch.is_empty());

    batch.add_limit_order("buy", 1.0, 20000.0).unwrap();
    assert_eq!(batch.len(), 1);
    let leg = &batch.legs()[0];
    assert_eq!(leg.get("ordertype"), Some(&json!("limit")));
    assert_eq!(leg.get("type"), Some(&json!("buy")));
    assert_eq!(leg.get("volume"), Some(&json!("1.00000000")));
    assert_eq!(leg.get("pair"), Some(&json!("XBTUSD")));
    assert_eq!(leg.get("price"), Some(&json!(20000.0)));
}

#[test]
fn test_wire_params_round_trip_through_json() {
    init_tracing();
    let mut extra = ParamMap::new();
    extra.insert("userref".to_string(), json!(42));
    extra.insert("validate".to_string(), json!(true));

    let mut batch = OrderBatchList::new("XBTUSD");
    batch
        .add_limit_order_with("buy", 1.0, 20000.0, &extra)
        .unwrap();
    batch
        .add_stop_loss_limit_order("sell", 1.0, 19000.0, 18900.0, "last", "#")
        .unwrap();

    let body = serde_json::to_string(&batch.wire_params()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(value["pair"], "XBTUSD");
    let orders = value["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["userref"], 42);
    assert_eq!(orders[0]["validate"], true);
    assert_eq!(orders[0]["ordertype"], "limit");
    assert_eq!(orders[1]["price2"], "#18900.0");
    assert!(orders[0].get("pair").is_none());
}

#[test]
fn test_volume_never_renders_scientific() {
    init_tracing();
    let mut batch = OrderBatchList::new("XBTUSD");
    batch.add_market_order("buy", 0.00000001).unwrap();

    let leg = &batch.legs()[0];
    assert_eq!(leg.get("volume"), Some(&json!("0.00000001")));
}
