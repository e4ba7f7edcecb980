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

use indexmap::IndexMap;
use marketsim_model::{
    enums::OrderSide,
    identifiers::{ClientOrderId, InstrumentId},
    orders::{Order, OrderAny},
    types::Price,
};

/// Working-order storage for a single instrument, together with the current
/// top-of-book state used for matching decisions.
///
/// All processed orders live in an insertion-ordered ledger keyed by client
/// order ID; the bid/ask lists reference the subset of working orders and are
/// kept in strict price priority (bids descending, asks ascending; ties keep
/// arrival order). Matching iterates over a snapshot of a side list because
/// fills and cancels mutate the underlying list.
#[derive(Clone, Debug)]
pub struct OrderIndex {
    /// The instrument ID for the index.
    pub instrument_id: InstrumentId,
    /// The minimum price increment for the instrument.
    pub price_increment: Price,
    /// The current best bid price (if initialized).
    pub bid: Option<Price>,
    /// The current best ask price (if initialized).
    pub ask: Option<Price>,
    /// The last traded price (if initialized).
    pub last: Option<Price>,
    orders: IndexMap<ClientOrderId, OrderAny>,
    orders_bid: Vec<ClientOrderId>,
    orders_ask: Vec<ClientOrderId>,
}

impl OrderIndex {
    /// Creates a new [`OrderIndex`] instance.
    #[must_use]
    pub fn new(instrument_id: InstrumentId, price_increment: Price) -> Self {
        Self {
            instrument_id,
            price_increment,
            bid: None,
            ask: None,
            last: None,
            orders: IndexMap::new(),
            orders_bid: Vec::new(),
            orders_ask: Vec::new(),
        }
    }

    /// Clears all orders and market state.
    pub fn reset(&mut self) {
        self.bid = None;
        self.ask = None;
        self.last = None;
        self.orders.clear();
        self.orders_bid.clear();
        self.orders_ask.clear();
    }

    // -- MARKET STATE ----------------------------------------------------------------------------

    pub fn set_bid_raw(&mut self, bid: Price) {
        self.bid = Some(bid);
    }

    pub fn set_ask_raw(&mut self, ask: Price) {
        self.ask = Some(ask);
    }

    pub fn set_last_raw(&mut self, last: Price) {
        self.last = Some(last);
    }

    /// Returns `true` if a limit order of `side` at `price` is marketable
    /// against the opposite best.
    #[must_use]
    pub fn is_limit_matched(&self, side: OrderSide, price: Price) -> bool {
        match side {
            OrderSide::Buy => self.ask.is_some_and(|a| a <= price),
            OrderSide::Sell => self.bid.is_some_and(|b| b >= price),
        }
    }

    /// Returns `true` if a stop order of `side` with `trigger_price` has its
    /// trigger at or through the market.
    #[must_use]
    pub fn is_stop_matched(&self, side: OrderSide, trigger_price: Price) -> bool {
        match side {
            OrderSide::Buy => self.ask.is_some_and(|a| a >= trigger_price),
            OrderSide::Sell => self.bid.is_some_and(|b| b <= trigger_price),
        }
    }

    // -- LEDGER ----------------------------------------------------------------------------------

    /// Returns `true` if an order with `client_order_id` has been processed.
    #[must_use]
    pub fn contains(&self, client_order_id: &ClientOrderId) -> bool {
        self.orders.contains_key(client_order_id)
    }

    /// Inserts the `order` into the ledger.
    pub fn insert(&mut self, order: OrderAny) {
        self.orders.insert(order.client_order_id(), order);
    }

    /// Returns the order for the given `client_order_id` (if found).
    #[must_use]
    pub fn get(&self, client_order_id: &ClientOrderId) -> Option<&OrderAny> {
        self.orders.get(client_order_id)
    }

    /// Returns a mutable reference to the order for the given `client_order_id`.
    #[must_use]
    pub fn get_mut(&mut self, client_order_id: &ClientOrderId) -> Option<&mut OrderAny> {
        self.orders.get_mut(client_order_id)
    }

    // -- WORKING ORDERS --------------------------------------------------------------------------

    /// Returns the working buy orders in price priority (descending).
    #[must_use]
    pub fn bids(&self) -> &[ClientOrderId] {
        &self.orders_bid
    }

    /// Returns the working sell orders in price priority (ascending).
    #[must_use]
    pub fn asks(&self) -> &[ClientOrderId] {
        &self.orders_ask
    }

    /// Returns `true` if the order is currently in a side list.
    #[must_use]
    pub fn is_working(&self, client_order_id: &ClientOrderId) -> bool {
        self.orders_bid.contains(client_order_id) || self.orders_ask.contains(client_order_id)
    }

    /// Returns all working orders, bids before asks, each in price priority.
    #[must_use]
    pub fn working_orders(&self) -> Vec<ClientOrderId> {
        let mut working = self.orders_bid.clone();
        working.extend_from_slice(&self.orders_ask);
        working
    }

    /// Adds the order to its side list at the position its price priority
    /// demands. A no-op if the order is already working or unknown.
    ///
    /// # Panics
    ///
    /// Panics if the order has no price to sort on.
    pub fn add_working(&mut self, client_order_id: &ClientOrderId) {
        if self.is_working(client_order_id) {
            return;
        }
        let (side, sort_px) = match self.orders.get(client_order_id) {
            Some(order) => (order.order_side(), Self::sort_price(order)),
            None => return,
        };
        match side {
            OrderSide::Buy => {
                let index = self
                    .orders_bid
                    .iter()
                    .position(|cid| self.sort_price_of(cid) < sort_px)
                    .unwrap_or(self.orders_bid.len());
                self.orders_bid.insert(index, *client_order_id);
            }
            OrderSide::Sell => {
                let index = self
                    .orders_ask
                    .iter()
                    .position(|cid| self.sort_price_of(cid) > sort_px)
                    .unwrap_or(self.orders_ask.len());
                self.orders_ask.insert(index, *client_order_id);
            }
        }
    }

    /// Removes the order from its side list (if present).
    pub fn remove_working(&mut self, client_order_id: &ClientOrderId) {
        self.orders_bid.retain(|cid| cid != client_order_id);
        self.orders_ask.retain(|cid| cid != client_order_id);
    }

    /// Re-inserts a working order at the position its current price demands
    /// (after a price update).
    pub fn reposition_working(&mut self, client_order_id: &ClientOrderId) {
        if !self.is_working(client_order_id) {
            return;
        }
        self.remove_working(client_order_id);
        self.add_working(client_order_id);
    }

    /// The price by which an order sorts in its side list: the limit price
    /// for limit orders, otherwise the stop/trigger price (the limit price
    /// once a stop-limit has triggered).
    fn sort_price(order: &OrderAny) -> Price {
        match order {
            OrderAny::Limit(o) => o.price,
            OrderAny::StopMarket(o) => o.trigger_price,
            OrderAny::StopLimit(o) => {
                if o.is_triggered {
                    o.price
                } else {
                    o.trigger_price
                }
            }
            OrderAny::Market(_) => panic!("Market orders are never working"),
        }
    }

    fn sort_price_of(&self, client_order_id: &ClientOrderId) -> Price {
        let order = self
            .orders
            .get(client_order_id)
            .unwrap_or_else(|| panic!("Working order {client_order_id} not found in ledger"));
        Self::sort_price(order)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use marketsim_model::{
        enums::OrderType,
        orders::OrderTestBuilder,
        types::Quantity,
    };
    use rstest::rstest;

    use super::*;

    fn index() -> OrderIndex {
        OrderIndex::new(InstrumentId::from("ETHUSDT-PERP.BINANCE"), Price::from("0.01"))
    }

    fn limit(cid: &str, side: OrderSide, price: &str) -> OrderAny {
        OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from("ETHUSDT-PERP.BINANCE"))
            .client_order_id(ClientOrderId::new(cid))
            .side(side)
            .price(Price::from(price))
            .quantity(Quantity::from(1))
            .build()
    }

    #[rstest]
    fn test_bids_sorted_descending() {
        let mut index = index();
        for (cid, px) in [("O-1", "100.00"), ("O-2", "102.00"), ("O-3", "101.00")] {
            index.insert(limit(cid, OrderSide::Buy, px));
            index.add_working(&ClientOrderId::new(cid));
        }
        let bids: Vec<&str> = index.bids().iter().map(|c| c.as_str()).collect();
        assert_eq!(bids, vec!["O-2", "O-3", "O-1"]);
    }

    #[rstest]
    fn test_asks_sorted_ascending_with_fifo_ties() {
        let mut index = index();
        for (cid, px) in [("O-1", "101.00"), ("O-2", "100.00"), ("O-3", "100.00")] {
            index.insert(limit(cid, OrderSide::Sell, px));
            index.add_working(&ClientOrderId::new(cid));
        }
        let asks: Vec<&str> = index.asks().iter().map(|c| c.as_str()).collect();
        assert_eq!(asks, vec!["O-2", "O-3", "O-1"]);
    }

    #[rstest]
    fn test_remove_working_keeps_ledger() {
        let mut index = index();
        let cid = ClientOrderId::new("O-1");
        index.insert(limit("O-1", OrderSide::Buy, "100.00"));
        index.add_working(&cid);
        assert!(index.is_working(&cid));

        index.remove_working(&cid);
        assert!(!index.is_working(&cid));
        assert!(index.contains(&cid));
    }

    #[rstest]
    fn test_add_working_is_idempotent() {
        let mut index = index();
        let cid = ClientOrderId::new("O-1");
        index.insert(limit("O-1", OrderSide::Buy, "100.00"));
        index.add_working(&cid);
        index.add_working(&cid);
        assert_eq!(index.bids().len(), 1);
    }

    #[rstest]
    #[case(OrderSide::Buy, "100.00", None, Some("100.00"), true)] // at the ask
    #[case(OrderSide::Buy, "99.00", None, Some("100.00"), false)] // below the ask
    #[case(OrderSide::Buy, "101.00", None, Some("100.00"), true)] // through the ask
    #[case(OrderSide::Sell, "100.00", Some("100.00"), None, true)] // at the bid
    #[case(OrderSide::Sell, "101.00", Some("100.00"), None, false)] // above the bid
    fn test_is_limit_matched(
        #[case] side: OrderSide,
        #[case] price: &str,
        #[case] bid: Option<&str>,
        #[case] ask: Option<&str>,
        #[case] expected: bool,
    ) {
        let mut index = index();
        if let Some(bid) = bid {
            index.set_bid_raw(Price::from(bid));
        }
        if let Some(ask) = ask {
            index.set_ask_raw(Price::from(ask));
        }
        assert_eq!(index.is_limit_matched(side, Price::from(price)), expected);
    }

    #[rstest]
    #[case(OrderSide::Buy, "100.00", Some("100.00"), true)] // trigger at the ask
    #[case(OrderSide::Buy, "101.00", Some("100.00"), false)] // trigger above the ask
    #[case(OrderSide::Buy, "99.00", Some("100.00"), true)] // trigger below the ask
    fn test_is_stop_matched_buy(
        #[case] side: OrderSide,
        #[case] trigger: &str,
        #[case] ask: Option<&str>,
        #[case] expected: bool,
    ) {
        let mut index = index();
        if let Some(ask) = ask {
            index.set_ask_raw(Price::from(ask));
        }
        assert_eq!(index.is_stop_matched(side, Price::from(trigger)), expected);
    }

    #[rstest]
    fn test_reposition_after_price_change() {
        let mut index = index();
        for (cid, px) in [("O-1", "100.00"), ("O-2", "101.00")] {
            index.insert(limit(cid, OrderSide::Buy, px));
            index.add_working(&ClientOrderId::new(cid));
        }

        // Move O-1 to the top of the bids
        if let Some(OrderAny::Limit(order)) = index.get_mut(&ClientOrderId::new("O-1")) {
            order.price = Price::from("102.00");
        }
        index.reposition_working(&ClientOrderId::new("O-1"));

        let bids: Vec<&str> = index.bids().iter().map(|c| c.as_str()).collect();
        assert_eq!(bids, vec!["O-1", "O-2"]);
    }
}
