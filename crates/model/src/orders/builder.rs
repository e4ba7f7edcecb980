// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

use marketsim_core::UnixNanos;

use super::{LimitOrder, MarketOrder, OrderAny, StopLimitOrder, StopMarketOrder};
use crate::{
    enums::{ContingencyType, OrderSide, OrderType, TimeInForce},
    identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId},
    types::{Price, Quantity},
};

/// A fluent builder for constructing orders in tests and examples.
#[derive(Clone, Debug)]
pub struct OrderTestBuilder {
    order_type: OrderType,
    trader_id: TraderId,
    strategy_id: StrategyId,
    instrument_id: Option<InstrumentId>,
    client_order_id: Option<ClientOrderId>,
    side: OrderSide,
    quantity: Option<Quantity>,
    price: Option<Price>,
    trigger_price: Option<Price>,
    time_in_force: TimeInForce,
    expire_time: Option<UnixNanos>,
    post_only: bool,
    reduce_only: bool,
    contingency_type: Option<ContingencyType>,
    linked_order_ids: Option<Vec<ClientOrderId>>,
    parent_order_id: Option<ClientOrderId>,
    ts_init: UnixNanos,
}

impl OrderTestBuilder {
    /// Creates a new [`OrderTestBuilder`] instance for the given `order_type`.
    #[must_use]
    pub fn new(order_type: OrderType) -> Self {
        Self {
            order_type,
            trader_id: TraderId::default(),
            strategy_id: StrategyId::default(),
            instrument_id: None,
            client_order_id: None,
            side: OrderSide::Buy,
            quantity: None,
            price: None,
            trigger_price: None,
            time_in_force: TimeInForce::Gtc,
            expire_time: None,
            post_only: false,
            reduce_only: false,
            contingency_type: None,
            linked_order_ids: None,
            parent_order_id: None,
            ts_init: UnixNanos::default(),
        }
    }

    pub fn trader_id(&mut self, trader_id: TraderId) -> &mut Self {
        self.trader_id = trader_id;
        self
    }

    pub fn strategy_id(&mut self, strategy_id: StrategyId) -> &mut Self {
        self.strategy_id = strategy_id;
        self
    }

    pub fn instrument_id(&mut self, instrument_id: InstrumentId) -> &mut Self {
        self.instrument_id = Some(instrument_id);
        self
    }

    pub fn client_order_id(&mut self, client_order_id: ClientOrderId) -> &mut Self {
        self.client_order_id = Some(client_order_id);
        self
    }

    pub fn side(&mut self, side: OrderSide) -> &mut Self {
        self.side = side;
        self
    }

    pub fn quantity(&mut self, quantity: Quantity) -> &mut Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(&mut self, price: Price) -> &mut Self {
        self.price = Some(price);
        self
    }

    pub fn trigger_price(&mut self, trigger_price: Price) -> &mut Self {
        self.trigger_price = Some(trigger_price);
        self
    }

    pub fn time_in_force(&mut self, time_in_force: TimeInForce) -> &mut Self {
        self.time_in_force = time_in_force;
        self
    }

    pub fn expire_time(&mut self, expire_time: UnixNanos) -> &mut Self {
        self.expire_time = Some(expire_time);
        self
    }

    pub fn post_only(&mut self, post_only: bool) -> &mut Self {
        self.post_only = post_only;
        self
    }

    pub fn reduce_only(&mut self, reduce_only: bool) -> &mut Self {
        self.reduce_only = reduce_only;
        self
    }

    pub fn contingency_type(&mut self, contingency_type: ContingencyType) -> &mut Self {
        self.contingency_type = Some(contingency_type);
        self
    }

    pub fn linked_order_ids(&mut self, linked_order_ids: Vec<ClientOrderId>) -> &mut Self {
        self.linked_order_ids = Some(linked_order_ids);
        self
    }

    pub fn parent_order_id(&mut self, parent_order_id: ClientOrderId) -> &mut Self {
        self.parent_order_id = Some(parent_order_id);
        self
    }

    pub fn ts_init(&mut self, ts_init: UnixNanos) -> &mut Self {
        self.ts_init = ts_init;
        self
    }

    /// Builds the order.
    ///
    /// # Panics
    ///
    /// Panics if a required field for the order type was not provided.
    #[must_use]
    pub fn build(&self) -> OrderAny {
        let instrument_id = self.instrument_id.expect("`instrument_id` was not set");
        let client_order_id = self
            .client_order_id
            .unwrap_or_else(|| ClientOrderId::new("O-19700101-000000-001-001-1"));
        let quantity = self.quantity.expect("`quantity` was not set");

        match self.order_type {
            OrderType::Market => OrderAny::Market(MarketOrder::new(
                self.trader_id,
                self.strategy_id,
                instrument_id,
                client_order_id,
                self.side,
                quantity,
                self.time_in_force,
                self.reduce_only,
                self.contingency_type,
                self.linked_order_ids.clone(),
                self.parent_order_id,
                self.ts_init,
            )),
            OrderType::Limit => OrderAny::Limit(LimitOrder::new(
                self.trader_id,
                self.strategy_id,
                instrument_id,
                client_order_id,
                self.side,
                quantity,
                self.price.expect("`price` was not set"),
                self.time_in_force,
                self.expire_time,
                self.post_only,
                self.reduce_only,
                self.contingency_type,
                self.linked_order_ids.clone(),
                self.parent_order_id,
                self.ts_init,
            )),
            OrderType::StopMarket => OrderAny::StopMarket(StopMarketOrder::new(
                self.trader_id,
                self.strategy_id,
                instrument_id,
                client_order_id,
                self.side,
                quantity,
                self.trigger_price.expect("`trigger_price` was not set"),
                self.time_in_force,
                self.expire_time,
                self.reduce_only,
                self.contingency_type,
                self.linked_order_ids.clone(),
                self.parent_order_id,
                self.ts_init,
            )),
            OrderType::StopLimit => OrderAny::StopLimit(StopLimitOrder::new(
                self.trader_id,
                self.strategy_id,
                instrument_id,
                client_order_id,
                self.side,
                quantity,
                self.price.expect("`price` was not set"),
                self.trigger_price.expect("`trigger_price` was not set"),
                self.time_in_force,
                self.expire_time,
                self.post_only,
                self.reduce_only,
                self.contingency_type,
                self.linked_order_ids.clone(),
                self.parent_order_id,
                self.ts_init,
            )),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::orders::Order;

    #[rstest]
    fn test_build_market_order() {
        let order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .side(OrderSide::Sell)
            .quantity(Quantity::from(100))
            .build();
        assert_eq!(order.order_type(), OrderType::Market);
        assert_eq!(order.order_side(), OrderSide::Sell);
        assert_eq!(order.price(), None);
    }

    #[rstest]
    #[should_panic(expected = "`price` was not set")]
    fn test_build_limit_order_without_price_panics() {
        let _ = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .quantity(Quantity::from(100))
            .build();
    }
}
