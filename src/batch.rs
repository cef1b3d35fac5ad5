//! Multi-leg order construction and validation.
//!
//! An [`OrderBatchList`] accumulates order legs against a single trading
//! pair. Every `add_*_order` call validates its leg in full before
//! anything is appended: a failed call raises the validation error to the
//! caller, appends nothing, and leaves the batch usable for further calls.
//!
//! Side, trigger, and offset arrive as wire strings and are checked
//! against the shared enumerations — the documented rejection messages are
//! part of the API surface, not incidental.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{KervielError, Result};
use crate::format;
use crate::models::{OffsetMarker, OrderSide, OrderType, Trigger};

/// String-keyed parameter map handed to the transport collaborator.
pub type ParamMap = Map<String, Value>;

/// One fully validated order leg, stored as its wire parameter map.
#[derive(Debug, Clone)]
pub struct OrderLeg {
    params: ParamMap,
}

impl OrderLeg {
    /// The leg's wire parameters (including the batch's pair).
    #[must_use]
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Shorthand lookup into the parameter map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// An append-only sequence of validated order legs bound to one pair.
#[derive(Debug, Clone)]
pub struct OrderBatchList {
    pair: String,
    legs: Vec<OrderLeg>,
}

impl OrderBatchList {
    /// Creates an empty batch for `pair`.
    #[must_use]
    pub fn new(pair: &str) -> Self {
        Self {
            pair: pair.to_string(),
            legs: Vec::new(),
        }
    }

    /// The trading pair every leg is bound to.
    #[must_use]
    pub fn pair(&self) -> &str {
        &self.pair
    }

    /// The validated legs, in append order.
    #[must_use]
    pub fn legs(&self) -> &[OrderLeg] {
        &self.legs
    }

    /// Number of legs appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// True when no leg has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Appends a market order leg.
    pub fn add_market_order(&mut self, side: &str, volume: f64) -> Result<()> {
        self.add_market_order_with(side, volume, &ParamMap::new())
    }

    /// Appends a market order leg with extra caller parameters.
    pub fn add_market_order_with(
        &mut self,
        side: &str,
        volume: f64,
        extra: &ParamMap,
    ) -> Result<()> {
        let side = validated_side(side)?;
        validated_volume(volume)?;
        self.push_leg(OrderType::Market, side, volume, extra, Vec::new());
        Ok(())
    }

    /// Appends a limit order leg.
    pub fn add_limit_order(&mut self, side: &str, volume: f64, price: f64) -> Result<()> {
        self.add_limit_order_with(side, volume, price, &ParamMap::new())
    }

    /// Appends a limit order leg with extra caller parameters.
    pub fn add_limit_order_with(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        extra: &ParamMap,
    ) -> Result<()> {
        let side = validated_side(side)?;
        validated_volume(volume)?;
        validated_price(price)?;
        self.push_leg(
            OrderType::Limit,
            side,
            volume,
            extra,
            vec![("price", Value::from(price))],
        );
        Ok(())
    }

    /// Appends a stop-loss order leg triggered off `trigger`.
    pub fn add_stop_loss_order(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        trigger: &str,
    ) -> Result<()> {
        self.add_stop_loss_order_with(side, volume, price, trigger, &ParamMap::new())
    }

    /// Appends a stop-loss order leg with extra caller parameters.
    pub fn add_stop_loss_order_with(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        trigger: &str,
        extra: &ParamMap,
    ) -> Result<()> {
        self.add_triggered(OrderType::StopLoss, side, volume, price, trigger, extra)
    }

    /// Appends a take-profit order leg triggered off `trigger`.
    pub fn add_take_profit_order(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        trigger: &str,
    ) -> Result<()> {
        self.add_take_profit_order_with(side, volume, price, trigger, &ParamMap::new())
    }

    /// Appends a take-profit order leg with extra caller parameters.
    pub fn add_take_profit_order_with(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        trigger: &str,
        extra: &ParamMap,
    ) -> Result<()> {
        self.add_triggered(OrderType::TakeProfit, side, volume, price, trigger, extra)
    }

    /// Appends a stop-loss-limit order leg.
    ///
    /// The secondary price is serialized as `offset` concatenated with the
    /// plain-rendered value (`"#18900.0"`), never as two separate fields.
    pub fn add_stop_loss_limit_order(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        price2: f64,
        trigger: &str,
        offset: &str,
    ) -> Result<()> {
        self.add_stop_loss_limit_order_with(
            side,
            volume,
            price,
            price2,
            trigger,
            offset,
            &ParamMap::new(),
        )
    }

    /// Appends a stop-loss-limit order leg with extra caller parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn add_stop_loss_limit_order_with(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        price2: f64,
        trigger: &str,
        offset: &str,
        extra: &ParamMap,
    ) -> Result<()> {
        self.add_triggered_limit(
            OrderType::StopLossLimit,
            side,
            volume,
            price,
            price2,
            trigger,
            offset,
            extra,
        )
    }

    /// Appends a take-profit-limit order leg.
    pub fn add_take_profit_limit_order(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        price2: f64,
        trigger: &str,
        offset: &str,
    ) -> Result<()> {
        self.add_take_profit_limit_order_with(
            side,
            volume,
            price,
            price2,
            trigger,
            offset,
            &ParamMap::new(),
        )
    }

    /// Appends a take-profit-limit order leg with extra caller parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn add_take_profit_limit_order_with(
        &mut self,
        side: &str,
        volume: f64,
        price: f64,
        price2: f64,
        trigger: &str,
        offset: &str,
        extra: &ParamMap,
    ) -> Result<()> {
        self.add_triggered_limit(
            OrderType::TakeProfitLimit,
            side,
            volume,
            price,
            price2,
            trigger,
            offset,
            extra,
        )
    }

    /// The parameter map handed to the transport collaborator.
    ///
    /// A single leg submits flat; multiple legs submit as a `pair` plus an
    /// `orders` array (the per-leg maps minus the repeated pair).
    #[must_use]
    pub fn wire_params(&self) -> ParamMap {
        if let [leg] = self.legs.as_slice() {
            return leg.params.clone();
        }
        let orders: Vec<Value> = self
            .legs
            .iter()
            .map(|leg| {
                let mut entry = leg.params.clone();
                entry.remove("pair");
                Value::Object(entry)
            })
            .collect();
        let mut params = ParamMap::new();
        params.insert("pair".to_string(), Value::from(self.pair.clone()));
        params.insert("orders".to_string(), Value::from(orders));
        params
    }

    fn add_triggered(
        &mut self,
        ordertype: OrderType,
        side: &str,
        volume: f64,
        price: f64,
        trigger: &str,
        extra: &ParamMap,
    ) -> Result<()> {
        let side = validated_side(side)?;
        validated_volume(volume)?;
        validated_price(price)?;
        let trigger = validated_trigger(trigger)?;
        self.push_leg(
            ordertype,
            side,
            volume,
            extra,
            vec![
                ("price", Value::from(price)),
                ("trigger", Value::from(trigger.as_str())),
            ],
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn add_triggered_limit(
        &mut self,
        ordertype: OrderType,
        side: &str,
        volume: f64,
        price: f64,
        price2: f64,
        trigger: &str,
        offset: &str,
        extra: &ParamMap,
    ) -> Result<()> {
        let side = validated_side(side)?;
        validated_volume(volume)?;
        validated_price(price)?;
        let trigger = validated_trigger(trigger)?;
        if price2 < 0.0 {
            return Err(KervielError::Validation(
                "price2 cannot be negative".to_string(),
            ));
        }
        let offset = validated_offset(offset)?;
        let price2 = format!("{}{}", offset.as_char(), format::plain(price2));
        self.push_leg(
            ordertype,
            side,
            volume,
            extra,
            vec![
                ("price", Value::from(price)),
                ("price2", Value::from(price2)),
                ("trigger", Value::from(trigger.as_str())),
            ],
        );
        Ok(())
    }

    /// Assembles and appends a leg. Extras go in first so that the
    /// leg-specific fields always win on key collision.
    fn push_leg(
        &mut self,
        ordertype: OrderType,
        side: OrderSide,
        volume: f64,
        extra: &ParamMap,
        fields: Vec<(&str, Value)>,
    ) {
        let mut params = extra.clone();
        params.insert("ordertype".to_string(), Value::from(ordertype.as_str()));
        params.insert("type".to_string(), Value::from(side.as_str()));
        params.insert("volume".to_string(), Value::from(format::volume(volume)));
        params.insert("pair".to_string(), Value::from(self.pair.clone()));
        for (key, value) in fields {
            params.insert(key.to_string(), value);
        }
        debug!(
            pair = %self.pair,
            ordertype = ordertype.as_str(),
            legs = self.legs.len() + 1,
            "appended order leg"
        );
        self.legs.push(OrderLeg { params });
    }
}

fn validated_side(raw: &str) -> Result<OrderSide> {
    OrderSide::from_wire(raw)
        .ok_or_else(|| KervielError::Validation("type must be buy or sell".to_string()))
}

fn validated_volume(volume: f64) -> Result<()> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(KervielError::Validation(
            "volume cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validated_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(KervielError::Validation(
            "price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validated_trigger(raw: &str) -> Result<Trigger> {
    Trigger::from_wire(raw)
        .ok_or_else(|| KervielError::Validation("trigger must be last or index".to_string()))
}

fn validated_offset(raw: &str) -> Result<OffsetMarker> {
    OffsetMarker::from_wire(raw)
        .ok_or_else(|| KervielError::Validation("offset must be +,-,# or %".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn limit_leg_carries_the_documented_fields() {
        let mut batch = OrderBatchList::new("XBTUSD");
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
    fn secondary_price_is_offset_concatenated() {
        let mut batch = OrderBatchList::new("XBTUSD");
        batch
            .add_stop_loss_limit_order("sell", 1.0, 19000.0, 18900.0, "last", "#")
            .unwrap();

        let leg = &batch.legs()[0];
        assert_eq!(leg.get("price2"), Some(&json!("#18900.0")));
        assert_eq!(leg.get("trigger"), Some(&json!("last")));
    }

    #[test]
    fn bad_trigger_fails_without_poisoning_the_batch() {
        let mut batch = OrderBatchList::new("XBTUSD");
        let err = batch
            .add_stop_loss_order("sell", 1.0, 19000.0, "bogus")
            .unwrap_err();
        assert!(matches!(
            err,
            KervielError::Validation(msg) if msg == "trigger must be last or index"
        ));
        assert!(batch.is_empty());

        batch.add_limit_order("buy", 1.0, 20000.0).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn bad_offset_uses_the_documented_message() {
        let mut batch = OrderBatchList::new("XBTUSD");
        let err = batch
            .add_take_profit_limit_order("buy", 1.0, 21000.0, 150.5, "index", "~")
            .unwrap_err();
        assert!(matches!(
            err,
            KervielError::Validation(msg) if msg == "offset must be +,-,# or %"
        ));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut batch = OrderBatchList::new("XBTUSD");
        assert!(batch.add_market_order("buy", -0.5).is_err());
        assert!(batch.add_limit_order("sell", 1.0, -1.0).is_err());
        assert!(
            batch
                .add_stop_loss_limit_order("sell", 1.0, 19000.0, -18900.0, "last", "#")
                .is_err()
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn unknown_side_is_rejected() {
        let mut batch = OrderBatchList::new("XBTUSD");
        let err = batch.add_market_order("hold", 1.0).unwrap_err();
        assert!(matches!(
            err,
            KervielError::Validation(msg) if msg == "type must be buy or sell"
        ));
    }

    #[test]
    fn leg_fields_win_over_caller_extras() {
        let mut extra = ParamMap::new();
        extra.insert("leverage".to_string(), json!("2:1"));
        extra.insert("ordertype".to_string(), json!("market"));

        let mut batch = OrderBatchList::new("XBTUSD");
        batch
            .add_limit_order_with("buy", 1.0, 20000.0, &extra)
            .unwrap();

        let leg = &batch.legs()[0];
        assert_eq!(leg.get("leverage"), Some(&json!("2:1")));
        assert_eq!(leg.get("ordertype"), Some(&json!("limit")));
    }

    #[test]
    fn plus_offset_renders_with_sign() {
        let mut batch = OrderBatchList::new("XBTUSD");
        batch
            .add_take_profit_limit_order("sell", 2.0, 21000.0, 150.5, "index", "+")
            .unwrap();
        assert_eq!(batch.legs()[0].get("price2"), Some(&json!("+150.5")));
    }

    #[test]
    fn single_leg_submits_flat() {
        let mut batch = OrderBatchList::new("XBTUSD");
        batch.add_market_order("buy", 0.25).unwrap();

        let params = batch.wire_params();
        assert_eq!(params.get("pair"), Some(&json!("XBTUSD")));
        assert_eq!(params.get("ordertype"), Some(&json!("market")));
        assert!(params.get("orders").is_none());
    }

    #[test]
    fn multi_leg_submits_an_orders_array() {
        let mut batch = OrderBatchList::new("XBTUSD");
        batch.add_limit_order("buy", 1.0, 20000.0).unwrap();
        batch.add_limit_order("sell", 1.0, 22000.0).unwrap();

        let params = batch.wire_params();
        assert_eq!(params.get("pair"), Some(&json!("XBTUSD")));
        let orders = params.get("orders").unwrap().as_array().unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[0].get("pair").is_none());
        assert_eq!(orders[1]["price"], json!(22000.0));
    }
}
