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

//! An order matching engine for a single market.

use std::{cell::RefCell, rc::Rc};

use marketsim_common::{cache::Cache, clock::Clock};
use marketsim_core::UnixNanos;
use marketsim_model::{
    data::{Bar, BookOrder, OrderBookDelta, OrderBookDeltas, QuoteTick, TradeTick},
    enums::{
        AccountType, AggressorSide, BookType, ContingencyType, LiquiditySide, OmsType, OrderSide,
        OrderStatus, OrderType, PriceType, TimeInForce,
    },
    events::{
        OrderAccepted, OrderCancelRejected, OrderCanceled, OrderEventAny, OrderExpired,
        OrderFilled, OrderModifyRejected, OrderPendingCancel, OrderPendingUpdate, OrderRejected,
        OrderSubmitted, OrderTriggered, OrderUpdated,
    },
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId, Venue,
        VenueOrderId,
    },
    instruments::{Instrument, InstrumentAny},
    orderbook::OrderBook,
    orders::{Order, OrderAny},
    types::{Price, Quantity},
};
use ustr::Ustr;

use crate::{
    client::ExecutionClient,
    matching_engine::{config::OrderMatchingEngineConfig, ids::IdsGenerator, index::OrderIndex},
    messages::{CancelOrder, ModifyOrder},
    models::{
        fee::{FeeModel, FeeModelAny},
        fill::FillModel,
    },
};

/// An order matching engine for a single market.
///
/// Owns the reconstructed book and the working-order index for its
/// instrument, validates and matches incoming orders, and emits the resulting
/// lifecycle events through the registered execution client. All emitted
/// events are stamped from the shared simulated clock.
pub struct OrderMatchingEngine {
    /// The venue for the matching engine.
    pub venue: Venue,
    /// The instrument for the matching engine.
    pub instrument: InstrumentAny,
    /// The instruments 1-based registration index at the venue.
    pub raw_id: u32,
    /// The order book type for the matching engine.
    pub book_type: BookType,
    /// The order management system (OMS) type for the matching engine.
    pub oms_type: OmsType,
    /// The account type for the matching engine.
    pub account_type: AccountType,
    /// The config for the matching engine.
    pub config: OrderMatchingEngineConfig,
    clock: Rc<RefCell<dyn Clock>>,
    cache: Rc<RefCell<Cache>>,
    exec_client: Option<Rc<dyn ExecutionClient>>,
    book: OrderBook,
    index: OrderIndex,
    fill_model: FillModel,
    fee_model: FeeModelAny,
    ids: Rc<RefCell<IdsGenerator>>,
    last_bar_bid: Option<Bar>,
    last_bar_ask: Option<Bar>,
}

impl OrderMatchingEngine {
    /// Creates a new [`OrderMatchingEngine`] instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instrument: InstrumentAny,
        raw_id: u32,
        fill_model: FillModel,
        fee_model: FeeModelAny,
        book_type: BookType,
        oms_type: OmsType,
        account_type: AccountType,
        clock: Rc<RefCell<dyn Clock>>,
        cache: Rc<RefCell<Cache>>,
        ids: Rc<RefCell<IdsGenerator>>,
        config: OrderMatchingEngineConfig,
    ) -> Self {
        let book = OrderBook::new(instrument.id(), book_type);
        let index = OrderIndex::new(instrument.id(), instrument.price_increment());
        Self {
            venue: instrument.id().venue,
            instrument,
            raw_id,
            book_type,
            oms_type,
            account_type,
            config,
            clock,
            cache,
            exec_client: None,
            book,
            index,
            fill_model,
            fee_model,
            ids,
            last_bar_bid: None,
            last_bar_ask: None,
        }
    }

    /// Registers the execution client (event sink) with the engine.
    pub fn register_client(&mut self, client: Rc<dyn ExecutionClient>) {
        self.exec_client = Some(client);
    }

    /// Resets the engine to its initial state, clearing the book and all orders.
    pub fn reset(&mut self) {
        self.book.clear(0, UnixNanos::default());
        self.index.reset();
        self.last_bar_bid = None;
        self.last_bar_ask = None;

        log::info!("Reset {}", self.instrument.id());
    }

    /// Replaces the fill model.
    pub fn set_fill_model(&mut self, fill_model: FillModel) {
        self.fill_model = fill_model;
    }

    /// Returns the best bid price for the market (if any).
    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.book.best_bid_price()
    }

    /// Returns the best ask price for the market (if any).
    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.book.best_ask_price()
    }

    /// Returns a reference to the engine's order book.
    #[must_use]
    pub const fn get_book(&self) -> &OrderBook {
        &self.book
    }

    /// Returns `true` if an order with `client_order_id` has been processed.
    #[must_use]
    pub fn order_exists(&self, client_order_id: ClientOrderId) -> bool {
        self.index.contains(&client_order_id)
    }

    /// Returns the order for the given `client_order_id` (if found).
    #[must_use]
    pub fn get_order(&self, client_order_id: &ClientOrderId) -> Option<&OrderAny> {
        self.index.get(client_order_id)
    }

    /// Returns the working buy orders in price priority.
    #[must_use]
    pub fn get_open_bid_orders(&self) -> &[ClientOrderId] {
        self.index.bids()
    }

    /// Returns the working sell orders in price priority.
    #[must_use]
    pub fn get_open_ask_orders(&self) -> &[ClientOrderId] {
        self.index.asks()
    }

    /// Returns all working orders, bids before asks.
    #[must_use]
    pub fn get_open_orders(&self) -> Vec<ClientOrderId> {
        self.index.working_orders()
    }

    // -- DATA PROCESSING -------------------------------------------------------------------------

    /// Processes the market for the given order book `delta`.
    pub fn process_order_book_delta(&mut self, delta: &OrderBookDelta) {
        log::debug!("Processing {delta}");
        self.clock.borrow_mut().set_time(delta.ts_event);

        if self.book_type == BookType::L2_MBP || self.book_type == BookType::L3_MBO {
            self.book.apply_delta(delta);
        }

        self.iterate(delta.ts_event);
    }

    /// Processes the market for the given order book `deltas`.
    pub fn process_order_book_deltas(&mut self, deltas: &OrderBookDeltas) {
        log::debug!("Processing {}", deltas.instrument_id);
        self.clock.borrow_mut().set_time(deltas.ts_event);

        if self.book_type == BookType::L2_MBP || self.book_type == BookType::L3_MBO {
            self.book.apply_deltas(deltas);
        }

        self.iterate(deltas.ts_event);
    }

    /// Processes the market for the given `quote`.
    pub fn process_quote_tick(&mut self, quote: &QuoteTick) {
        log::debug!("Processing {quote}");
        self.clock.borrow_mut().set_time(quote.ts_event);

        if self.book_type == BookType::L1_TBBO {
            self.book
                .update_quote_tick(quote)
                .expect("Invalid book operation for quote");
        }

        self.iterate(quote.ts_event);
    }

    /// Processes the market for the given `trade`.
    pub fn process_trade_tick(&mut self, trade: &TradeTick) {
        log::debug!("Processing {trade}");
        self.clock.borrow_mut().set_time(trade.ts_event);

        if self.book_type == BookType::L1_TBBO {
            self.book
                .update_trade_tick(trade)
                .expect("Invalid book operation for trade");
        }
        self.index.set_last_raw(trade.price);

        self.iterate(trade.ts_event);
    }

    /// Processes the market for the given `bar`.
    ///
    /// Always advances the clock. Matching from bars runs only when the
    /// engine is configured for bar execution on a top-of-book feed, with
    /// externally aggregated bars decomposed into four synthetic ticks.
    pub fn process_bar(&mut self, bar: &Bar) {
        log::debug!("Processing {bar}");
        self.clock.borrow_mut().set_time(bar.ts_event);

        if !self.config.bar_execution
            || self.book_type != BookType::L1_TBBO
            || bar.bar_type.aggregation_source
                != marketsim_model::enums::AggregationSource::External
        {
            return;
        }

        match bar.bar_type.price_type {
            PriceType::Last | PriceType::Mid => self.process_trade_ticks_from_bar(bar),
            PriceType::Bid => {
                self.last_bar_bid = Some(*bar);
                self.process_quote_ticks_from_bar(bar);
            }
            PriceType::Ask => {
                self.last_bar_ask = Some(*bar);
                self.process_quote_ticks_from_bar(bar);
            }
        }
    }

    fn bar_trade_id(bar: &Bar, leg: u32) -> TradeId {
        TradeId::new(format!("{}-{}-{leg}", bar.instrument_id().symbol, bar.ts_event))
    }

    fn process_trade_ticks_from_bar(&mut self, bar: &Bar) {
        // Split the bar into four trades with quarter volume
        let size = Quantity::new(bar.volume.as_f64() / 4.0, bar.volume.precision);
        let aggressor_side = if self.index.last.is_none_or(|last| bar.open > last) {
            AggressorSide::Buyer
        } else {
            AggressorSide::Seller
        };

        let mut trade = TradeTick::new(
            bar.instrument_id(),
            bar.open,
            size,
            aggressor_side,
            Self::bar_trade_id(bar, 1),
            bar.ts_event,
            bar.ts_init,
        );

        // Open
        if self.index.last.is_none() {
            self.process_trade_tick(&trade);
        }

        // High, assumption: market traded up, aggressor lifting the offer
        if self.index.last.is_some_and(|last| bar.high > last) {
            trade.price = bar.high;
            trade.aggressor_side = AggressorSide::Buyer;
            trade.trade_id = Self::bar_trade_id(bar, 2);
            self.process_trade_tick(&trade);
        }

        // Low, assumption: market traded down, aggressor hitting the bid
        if self.index.last.is_some_and(|last| bar.low < last) {
            trade.price = bar.low;
            trade.aggressor_side = AggressorSide::Seller;
            trade.trade_id = Self::bar_trade_id(bar, 3);
            self.process_trade_tick(&trade);
        }

        // Close
        if self.index.last.is_some_and(|last| bar.close != last) {
            trade.aggressor_side = if self.index.last.is_some_and(|last| bar.close > last) {
                AggressorSide::Buyer
            } else {
                AggressorSide::Seller
            };
            trade.price = bar.close;
            trade.trade_id = Self::bar_trade_id(bar, 4);
            self.process_trade_tick(&trade);
        }
    }

    fn process_quote_ticks_from_bar(&mut self, bar: &Bar) {
        // Wait for the matching bid/ask bar pair
        let (bid_bar, ask_bar) = match (self.last_bar_bid, self.last_bar_ask) {
            (Some(bid), Some(ask)) if bid.ts_event == ask.ts_event => (bid, ask),
            _ => return,
        };
        let bid_size = Quantity::new(bid_bar.volume.as_f64() / 4.0, bar.volume.precision);
        let ask_size = Quantity::new(ask_bar.volume.as_f64() / 4.0, bar.volume.precision);

        let mut quote = QuoteTick::new(
            bar.instrument_id(),
            bid_bar.open,
            ask_bar.open,
            bid_size,
            ask_size,
            bid_bar.ts_event,
            bid_bar.ts_init,
        );

        // Open
        self.process_quote_tick(&quote);

        // High
        quote.bid_price = bid_bar.high;
        quote.ask_price = ask_bar.high;
        self.process_quote_tick(&quote);

        // Low
        quote.bid_price = bid_bar.low;
        quote.ask_price = ask_bar.low;
        self.process_quote_tick(&quote);

        // Close
        quote.bid_price = bid_bar.close;
        quote.ask_price = ask_bar.close;
        self.process_quote_tick(&quote);

        self.last_bar_bid = None;
        self.last_bar_ask = None;
    }

    // -- TRADING COMMANDS ------------------------------------------------------------------------

    /// Processes the submission of `order` to the venue.
    pub fn process_order(&mut self, order: OrderAny) {
        let client_order_id = order.client_order_id();

        // Idempotent on duplicate submission
        if self.index.contains(&client_order_id) {
            log::debug!("Order {client_order_id} already submitted, ignoring");
            return;
        }

        self.index.insert(order);
        self.generate_order_submitted(&client_order_id);
        let order = self
            .index
            .get(&client_order_id)
            .expect("Order must be in the index")
            .clone();

        // Contingent orders checks
        if self.config.support_contingent_orders {
            if let Some(parent_order_id) = order.parent_order_id() {
                let parent_status = match self.index.get(&parent_order_id) {
                    Some(parent)
                        if parent.contingency_type() == Some(ContingencyType::Oto) =>
                    {
                        parent.status()
                    }
                    Some(_) | None => panic!("OTO parent {parent_order_id} not found"),
                };
                match parent_status {
                    OrderStatus::Rejected => {
                        self.generate_order_rejected(
                            &client_order_id,
                            format!("REJECT OTO from {parent_order_id}"),
                        );
                        return;
                    }
                    OrderStatus::Filled | OrderStatus::PartiallyFilled => {}
                    _ => {
                        // Held dark until the parent executes
                        log::info!(
                            "Pending OTO order {client_order_id} triggers from {parent_order_id}"
                        );
                        return;
                    }
                }
            }
        }

        // Check reduce-only instruction
        if self.config.use_reduce_only && order.is_reduce_only() {
            let position = self.position_for_order(&order);
            let would_increase = match &position {
                None => true,
                Some(position) => {
                    position.is_closed()
                        || (order.is_buy() && position.is_long())
                        || (order.is_sell() && position.is_short())
                }
            };
            if would_increase {
                self.generate_order_rejected(
                    &client_order_id,
                    format!(
                        "REDUCE_ONLY {} {} order would have increased position",
                        order.order_type(),
                        order.order_side(),
                    ),
                );
                return;
            }
        }

        self.dispatch_order(&order);
    }

    /// Processes a modify `command` against a working order.
    pub fn process_modify(&mut self, command: &ModifyOrder) {
        let client_order_id = command.client_order_id;
        let found_open = self
            .index
            .get(&client_order_id)
            .is_some_and(|order| !order.is_closed());
        if found_open {
            self.generate_order_pending_update(&client_order_id);
            self.update_order(
                &client_order_id,
                command.quantity,
                command.price,
                command.trigger_price,
                true,
            );
        } else {
            self.generate_order_modify_rejected(
                command.trader_id,
                command.strategy_id,
                client_order_id,
                format!("Order {client_order_id} not found"),
            );
        }
    }

    /// Processes a cancel `command` against a working order.
    pub fn process_cancel(&mut self, command: &CancelOrder) {
        let client_order_id = command.client_order_id;
        let found_open = self
            .index
            .get(&client_order_id)
            .is_some_and(|order| !order.is_closed());
        if found_open {
            self.generate_order_pending_cancel(&client_order_id);
            self.cancel_order(&client_order_id, true);
        } else {
            self.generate_order_cancel_rejected(
                command.trader_id,
                command.strategy_id,
                client_order_id,
                format!("Order {client_order_id} not found"),
            );
        }
    }

    fn dispatch_order(&mut self, order: &OrderAny) {
        match order.order_type() {
            OrderType::Market => self.process_market_order(order),
            OrderType::Limit => self.process_limit_order(order),
            OrderType::StopMarket => self.process_stop_market_order(order),
            OrderType::StopLimit => self.process_stop_limit_order(order),
        }
    }

    fn process_market_order(&mut self, order: &OrderAny) {
        // Check that an opposing market exists
        if (order.is_buy() && self.index.ask.is_none())
            || (order.is_sell() && self.index.bid.is_none())
        {
            self.generate_order_rejected(
                &order.client_order_id(),
                format!("No market for {}", order.instrument_id()),
            );
            return;
        }

        self.fill_market_order(order);
    }

    fn process_limit_order(&mut self, order: &OrderAny) {
        let limit_px = order.price().expect("Limit order must have a price");
        if order.is_post_only() && self.index.is_limit_matched(order.order_side(), limit_px) {
            self.generate_order_rejected(
                &order.client_order_id(),
                format!(
                    "POST_ONLY {} {} order limit px of {} would have been a TAKER: bid={}, ask={}",
                    order.order_type(),
                    order.order_side(),
                    limit_px,
                    self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                    self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                ),
            );
            return;
        }

        // Order is valid and accepted
        self.accept_order(&order.client_order_id());

        // Check for immediate fill
        if self.index.is_limit_matched(order.order_side(), limit_px) {
            self.fill_limit_order(order, LiquiditySide::Taker);
        } else if matches!(order.time_in_force(), TimeInForce::Fok | TimeInForce::Ioc) {
            self.cancel_order(&order.client_order_id(), true);
        }
    }

    fn process_stop_market_order(&mut self, order: &OrderAny) {
        let stop_px = order.trigger_price().expect("Stop order must have a trigger price");
        if self.index.is_stop_matched(order.order_side(), stop_px) {
            if self.config.reject_stop_orders {
                self.generate_order_rejected(
                    &order.client_order_id(),
                    format!(
                        "{} {} order stop px of {} was in the market: bid={}, ask={}, but rejected because of configuration",
                        order.order_type(),
                        order.order_side(),
                        stop_px,
                        self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                        self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                    ),
                );
                return;
            }
            self.fill_market_order(order);
            return;
        }

        // Order is not matched but is valid, so accept
        self.accept_order(&order.client_order_id());
    }

    fn process_stop_limit_order(&mut self, order: &OrderAny) {
        let stop_px = order.trigger_price().expect("Stop order must have a trigger price");
        if self.index.is_stop_matched(order.order_side(), stop_px) {
            if self.config.reject_stop_orders {
                self.generate_order_rejected(
                    &order.client_order_id(),
                    format!(
                        "{} {} order stop px of {} was in the market: bid={}, ask={}, but rejected because of configuration",
                        order.order_type(),
                        order.order_side(),
                        stop_px,
                        self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                        self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                    ),
                );
                return;
            }

            self.accept_order(&order.client_order_id());
            self.generate_order_triggered(&order.client_order_id());

            // Check for immediate fill of the limit leg
            let limit_px = order.price().expect("Stop limit order must have a price");
            if self.index.is_limit_matched(order.order_side(), limit_px) {
                let order = self
                    .index
                    .get(&order.client_order_id())
                    .expect("Order must be in the index")
                    .clone();
                self.fill_limit_order(&order, LiquiditySide::Taker);
            }
            return;
        }

        // Order is not matched but is valid, so accept
        self.accept_order(&order.client_order_id());
    }

    // -- ORDER PROCESSING ------------------------------------------------------------------------

    /// Iterates the matching engine, first expiring then matching the working
    /// bid and ask sides against the current market.
    pub fn iterate(&mut self, ts_now: UnixNanos) {
        if let Some(bid) = self.book.best_bid_price() {
            self.index.set_bid_raw(bid);
        }
        if let Some(ask) = self.book.best_ask_price() {
            self.index.set_ask_raw(ask);
        }

        // Iterate over stable snapshots as matching mutates the side lists
        let orders_bid = self.index.bids().to_vec();
        self.iterate_orders(ts_now, &orders_bid);
        let orders_ask = self.index.asks().to_vec();
        self.iterate_orders(ts_now, &orders_ask);
    }

    fn iterate_orders(&mut self, ts_now: UnixNanos, client_order_ids: &[ClientOrderId]) {
        for client_order_id in client_order_ids {
            let order = match self.index.get(client_order_id) {
                Some(order) if order.is_open() => order.clone(),
                _ => continue, // State changed during this iteration
            };

            // Check expiration
            if self.config.support_gtd_orders {
                if let Some(expire_time) = order.expire_time() {
                    if ts_now >= expire_time {
                        self.expire_order(client_order_id);
                        continue;
                    }
                }
            }

            self.match_order(&order);
        }
    }

    fn match_order(&mut self, order: &OrderAny) {
        match order {
            OrderAny::Limit(_) => self.match_limit_order(order),
            OrderAny::StopMarket(_) => self.match_stop_market_order(order),
            OrderAny::StopLimit(_) => self.match_stop_limit_order(order),
            OrderAny::Market(_) => {} // Market orders never rest
        }
    }

    fn match_limit_order(&mut self, order: &OrderAny) {
        let limit_px = order.price().expect("Limit order must have a price");
        if self.index.is_limit_matched(order.order_side(), limit_px) {
            self.fill_limit_order(order, LiquiditySide::Maker);
        }
    }

    fn match_stop_market_order(&mut self, order: &OrderAny) {
        let stop_px = order.trigger_price().expect("Stop order must have a trigger price");
        if self.is_stop_triggered(order.order_side(), stop_px) {
            // Triggered, fill as a market order
            self.fill_market_order(order);
        }
    }

    fn match_stop_limit_order(&mut self, order: &OrderAny) {
        if order.is_triggered().unwrap_or(false) {
            // The limit leg now behaves exactly as a limit order
            self.match_limit_order(order);
            return;
        }

        let stop_px = order.trigger_price().expect("Stop order must have a trigger price");
        if !self.is_stop_triggered(order.order_side(), stop_px) {
            return;
        }

        let client_order_id = order.client_order_id();
        self.generate_order_triggered(&client_order_id);

        // Test the limit leg against the market
        let limit_px = order.price().expect("Stop limit order must have a price");
        if self.index.is_limit_matched(order.order_side(), limit_px) {
            if order.is_post_only() {
                // Taking the market on trigger is a violation
                self.generate_order_rejected(
                    &client_order_id,
                    format!(
                        "POST_ONLY {} {} order limit px of {} would have been a TAKER: bid={}, ask={}",
                        order.order_type(),
                        order.order_side(),
                        limit_px,
                        self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                        self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                    ),
                );
                return;
            }
            let order = self
                .index
                .get(&client_order_id)
                .expect("Order must be in the index")
                .clone();
            self.fill_limit_order(&order, LiquiditySide::Taker);
        }
    }

    /// A stop is triggered when the market moves through its price, or rests
    /// on it and the fill model decides the touch executes.
    fn is_stop_triggered(&mut self, side: OrderSide, stop_px: Price) -> bool {
        match side {
            OrderSide::Buy => match self.index.ask {
                Some(ask) if ask > stop_px => true,
                Some(ask) if ask == stop_px => self.fill_model.is_stop_filled(),
                _ => false,
            },
            OrderSide::Sell => match self.index.bid {
                Some(bid) if bid < stop_px => true,
                Some(bid) if bid == stop_px => self.fill_model.is_stop_filled(),
                _ => false,
            },
        }
    }

    fn determine_limit_price_and_volume(&self, order: &OrderAny) -> Vec<(Price, Quantity)> {
        let order_price = order.price().expect("Limit order must have a price");
        let book_order =
            BookOrder::new(order.order_side(), order_price, self.leaves_qty(order), 1);
        self.book.simulate_fills(&book_order)
    }

    fn determine_market_price_and_volume(&self, order: &OrderAny) -> Vec<(Price, Quantity)> {
        let price = match order.order_side() {
            OrderSide::Buy => Price::max(self.instrument.price_precision()),
            OrderSide::Sell => Price::min(self.instrument.price_precision()),
        };
        let book_order = BookOrder::new(order.order_side(), price, self.leaves_qty(order), 0);
        self.book.simulate_fills(&book_order)
    }

    fn leaves_qty(&self, order: &OrderAny) -> Quantity {
        self.index
            .get(&order.client_order_id())
            .map_or_else(|| order.leaves_qty(), |o| o.leaves_qty())
    }

    fn fill_market_order(&mut self, order: &OrderAny) {
        let venue_position_id = self.get_position_id(order, true);
        let position_exists = self.position_exists(order, venue_position_id);

        if self.config.use_reduce_only && order.is_reduce_only() && !position_exists {
            log::warn!(
                "Canceling REDUCE_ONLY {} as would increase position",
                order.order_type()
            );
            self.cancel_order(&order.client_order_id(), true);
            return;
        }

        let fills = self.determine_market_price_and_volume(order);
        self.apply_fills(order, fills, LiquiditySide::Taker, venue_position_id);
    }

    fn fill_limit_order(&mut self, order: &OrderAny, liquidity_side: LiquiditySide) {
        let order_price = order.price().expect("Limit order must have a price");

        // A market resting exactly on the order price executes probabilistically
        if liquidity_side == LiquiditySide::Maker {
            if order.is_buy()
                && self.index.bid == Some(order_price)
                && !self.fill_model.is_limit_filled()
            {
                return; // Not filled
            }
            if order.is_sell()
                && self.index.ask == Some(order_price)
                && !self.fill_model.is_limit_filled()
            {
                return; // Not filled
            }
        }

        let venue_position_id = self.get_position_id(order, true);
        let position_exists = self.position_exists(order, venue_position_id);

        if self.config.use_reduce_only && order.is_reduce_only() && !position_exists {
            log::warn!(
                "Canceling REDUCE_ONLY {} as would increase position",
                order.order_type()
            );
            self.cancel_order(&order.client_order_id(), true);
            return;
        }

        let fills = self.determine_limit_price_and_volume(order);
        self.apply_fills(order, fills, liquidity_side, venue_position_id);
    }

    fn apply_fills(
        &mut self,
        order: &OrderAny,
        fills: Vec<(Price, Quantity)>,
        liquidity_side: LiquiditySide,
        venue_position_id: Option<PositionId>,
    ) {
        let client_order_id = order.client_order_id();

        if order.time_in_force() == TimeInForce::Fok {
            // The plan must satisfy the entire order
            let mut total_size = Quantity::zero(order.quantity().precision);
            for (_, fill_qty) in &fills {
                total_size += *fill_qty;
            }
            if self.leaves_qty(order) > total_size {
                self.cancel_order(&client_order_id, true);
                return;
            }
        }

        let live_status = self
            .index
            .get(&client_order_id)
            .map_or_else(|| order.status(), |o| o.status());
        if fills.is_empty() {
            if live_status == OrderStatus::Submitted {
                self.generate_order_rejected(
                    &client_order_id,
                    format!("No market for {}", order.instrument_id()),
                );
            } else {
                log::error!(
                    "Cannot fill order: no fills from book when fills were expected (check size in data)"
                );
            }
            return;
        }

        let is_stop_market = matches!(order, OrderAny::StopMarket(_));
        let mut last_plan_px: Option<Price> = None;

        for (index, &(plan_px, plan_qty)) in fills.iter().enumerate() {
            if self.order_closed(&client_order_id) {
                break;
            }

            last_plan_px = Some(plan_px);
            let mut fill_px = plan_px;
            let mut fill_qty = plan_qty;

            // Pessimistic stop pricing: the market moved through the stop price
            if is_stop_market && index == 0 {
                fill_px = order.trigger_price().expect("Stop order must have a trigger price");
            }

            if self.book_type == BookType::L1_TBBO && self.fill_model.is_slipped() {
                fill_px = match order.order_side() {
                    OrderSide::Buy => fill_px + self.instrument.price_increment(),
                    OrderSide::Sell => fill_px - self.instrument.price_increment(),
                };
            }

            // Clip the fill to honor a reduce-only instruction
            if self.config.use_reduce_only && order.is_reduce_only() {
                if let Some(position_qty) = self.position_quantity(order, venue_position_id) {
                    if fill_qty > position_qty {
                        if position_qty.is_zero() {
                            return;
                        }
                        let filled_qty = self
                            .index
                            .get(&client_order_id)
                            .map_or_else(|| order.filled_qty(), |o| o.filled_qty());
                        self.generate_order_updated(
                            &client_order_id,
                            filled_qty + position_qty,
                            None,
                            None,
                        );
                        fill_qty = position_qty;
                    }
                }
            }

            if fill_qty.is_zero() {
                if fills.len() == 1 && live_status == OrderStatus::Submitted {
                    self.generate_order_rejected(
                        &client_order_id,
                        format!("No market for {}", order.instrument_id()),
                    );
                }
                return;
            }

            self.fill_order(&client_order_id, fill_px, fill_qty, liquidity_side, venue_position_id);
        }

        if order.time_in_force() == TimeInForce::Ioc && !self.order_closed(&client_order_id) {
            // IOC order has filled all available size
            self.cancel_order(&client_order_id, true);
            return;
        }

        // Exhausted simulated book volume: continue aggressive filling into
        // the next level in the absence of depth
        if !self.order_closed(&client_order_id)
            && self.book_type == BookType::L1_TBBO
            && matches!(order.order_type(), OrderType::Market | OrderType::StopMarket)
        {
            if let Some(last_px) = last_plan_px {
                let next_px = match order.order_side() {
                    OrderSide::Buy => last_px + self.instrument.price_increment(),
                    OrderSide::Sell => last_px - self.instrument.price_increment(),
                };
                let leaves_qty = self
                    .index
                    .get(&client_order_id)
                    .map_or_else(|| order.leaves_qty(), |o| o.leaves_qty());
                self.fill_order(
                    &client_order_id,
                    next_px,
                    leaves_qty,
                    liquidity_side,
                    venue_position_id,
                );
            }
        }
    }

    fn order_closed(&self, client_order_id: &ClientOrderId) -> bool {
        self.index.get(client_order_id).is_none_or(|o| o.is_closed())
    }

    fn fill_order(
        &mut self,
        client_order_id: &ClientOrderId,
        last_px: Price,
        last_qty: Quantity,
        liquidity_side: LiquiditySide,
        venue_position_id: Option<PositionId>,
    ) {
        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index")
            .clone();

        let last_qty = last_qty.min(order.leaves_qty());
        if last_qty.is_zero() {
            return;
        }

        let commission = self
            .fee_model
            .get_commission(&order, last_qty, last_px, liquidity_side, &self.instrument)
            .expect("Failed to calculate commission");

        let venue_order_id = self.get_venue_order_id(&order);
        let trade_id = self.ids.borrow_mut().generate_execution_id();
        let ts_now = self.clock.borrow().timestamp_ns();

        self.apply_and_send(OrderEventAny::Filled(OrderFilled {
            trader_id: order.trader_id(),
            strategy_id: order.strategy_id(),
            instrument_id: order.instrument_id(),
            client_order_id: *client_order_id,
            venue_order_id,
            account_id: self.account_id(),
            trade_id,
            order_side: order.order_side(),
            order_type: order.order_type(),
            last_qty,
            last_px,
            currency: self.instrument.quote_currency(),
            commission: Some(commission),
            liquidity_side,
            position_id: venue_position_id,
            ts_event: ts_now,
            ts_init: ts_now,
        }));

        if self.config.support_contingent_orders {
            match order.contingency_type() {
                Some(ContingencyType::Oto) => self.process_oto_children(client_order_id),
                Some(ContingencyType::Oco) => {
                    if self.order_closed(client_order_id) {
                        self.cancel_contingent_orders(client_order_id);
                    } else {
                        self.update_contingent_orders(client_order_id);
                    }
                }
                None => {}
            }
        }

        if self.config.use_reduce_only {
            self.check_reduce_only_orders(client_order_id, &order, venue_position_id);
        }
    }

    fn process_oto_children(&mut self, parent_order_id: &ClientOrderId) {
        let parent = self
            .index
            .get(parent_order_id)
            .expect("Order must be in the index")
            .clone();
        let child_order_ids: Vec<ClientOrderId> =
            parent.linked_order_ids().map(<[ClientOrderId]>::to_vec).unwrap_or_default();

        for child_order_id in child_order_ids {
            let child = match self.index.get(&child_order_id) {
                Some(child) => child.clone(),
                None => continue, // Child not yet submitted
            };
            if child.is_closed() {
                continue;
            }

            // Pass the parent position through to the child
            if let (None, Some(position_id)) = (child.position_id(), parent.position_id()) {
                if let Some(child) = self.index.get_mut(&child_order_id) {
                    child.set_position_id(Some(position_id));
                }
                self.cache.borrow_mut().add_position_id(position_id, child_order_id);
                log::debug!("Indexed position id {position_id} for order {child_order_id}");
            }

            if child.status() == OrderStatus::Submitted {
                // Release the pending child into the market
                let child = self
                    .index
                    .get(&child_order_id)
                    .expect("Order must be in the index")
                    .clone();
                self.dispatch_order(&child);
            }
        }
    }

    fn update_contingent_orders(&mut self, client_order_id: &ClientOrderId) {
        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index")
            .clone();
        log::debug!("Updating OCO orders from {client_order_id}");
        let linked_order_ids: Vec<ClientOrderId> =
            order.linked_order_ids().map(<[ClientOrderId]>::to_vec).unwrap_or_default();

        for linked_order_id in linked_order_ids {
            let sibling = match self.index.get(&linked_order_id) {
                Some(sibling) => sibling.clone(),
                None => panic!("Cannot find OCO sibling order for {linked_order_id}"),
            };
            if sibling.is_closed() || sibling.status() == OrderStatus::Initialized {
                continue;
            }

            if order.leaves_qty().is_zero() {
                self.cancel_order(&linked_order_id, true);
            } else if sibling.leaves_qty() != order.leaves_qty() {
                let quantity = sibling.filled_qty() + order.leaves_qty();
                self.update_order(&linked_order_id, Some(quantity), None, None, false);
            }
        }
    }

    fn cancel_contingent_orders(&mut self, client_order_id: &ClientOrderId) {
        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index")
            .clone();
        let linked_order_ids: Vec<ClientOrderId> =
            order.linked_order_ids().map(<[ClientOrderId]>::to_vec).unwrap_or_default();

        for linked_order_id in linked_order_ids {
            let contingent = match self.index.get(&linked_order_id) {
                Some(contingent) => contingent.clone(),
                None => panic!("Cannot find contingent order for {linked_order_id}"),
            };
            if !contingent.is_closed() {
                // Single pass, the contingent cancel does not re-cascade
                self.cancel_order(&linked_order_id, false);
            }
        }
    }

    fn check_reduce_only_orders(
        &mut self,
        filled_order_id: &ClientOrderId,
        order: &OrderAny,
        venue_position_id: Option<PositionId>,
    ) {
        let position_qty = match self.position_quantity(order, venue_position_id) {
            Some(position_qty) => position_qty,
            None => return,
        };

        for client_order_id in self.index.working_orders() {
            if client_order_id == *filled_order_id {
                continue;
            }
            let working = match self.index.get(&client_order_id) {
                Some(working) => working.clone(),
                None => continue,
            };
            if !working.is_reduce_only() || working.is_closed() {
                continue;
            }

            if position_qty.is_zero() {
                self.cancel_order(&client_order_id, true);
            } else if working.leaves_qty() > position_qty {
                let quantity = working.filled_qty() + position_qty;
                self.generate_order_updated(&client_order_id, quantity, None, None);
            }
        }
    }

    // -- ORDER UPDATES ---------------------------------------------------------------------------

    fn update_order(
        &mut self,
        client_order_id: &ClientOrderId,
        quantity: Option<Quantity>,
        price: Option<Price>,
        trigger_price: Option<Price>,
        update_contingencies: bool,
    ) {
        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index")
            .clone();
        let quantity = quantity.unwrap_or_else(|| order.quantity());

        match &order {
            OrderAny::Limit(_) => {
                let price = price.unwrap_or_else(|| order.price().unwrap());
                self.update_limit_order(&order, quantity, price);
            }
            OrderAny::StopMarket(_) => {
                let trigger_price = trigger_price.unwrap_or_else(|| order.trigger_price().unwrap());
                self.update_stop_market_order(&order, quantity, trigger_price);
            }
            OrderAny::StopLimit(_) => {
                let price = price.unwrap_or_else(|| order.price().unwrap());
                let trigger_price = trigger_price.unwrap_or_else(|| order.trigger_price().unwrap());
                self.update_stop_limit_order(&order, quantity, price, trigger_price);
            }
            OrderAny::Market(_) => {
                panic!("Unsupported order type {} for update_order", order.order_type())
            }
        }

        if self.config.support_contingent_orders
            && order.contingency_type() == Some(ContingencyType::Oco)
            && update_contingencies
        {
            self.update_contingent_orders(client_order_id);
        }
    }

    fn update_limit_order(&mut self, order: &OrderAny, quantity: Quantity, price: Price) {
        let client_order_id = order.client_order_id();
        if self.index.is_limit_matched(order.order_side(), price) {
            if order.is_post_only() {
                self.generate_order_modify_rejected(
                    order.trader_id(),
                    order.strategy_id(),
                    client_order_id,
                    format!(
                        "POST_ONLY {} {} order with new limit px of {} would have been a TAKER: bid={}, ask={}",
                        order.order_type(),
                        order.order_side(),
                        price,
                        self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                        self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                    ),
                );
                return;
            }

            self.generate_order_updated(&client_order_id, quantity, Some(price), None);
            let order = self
                .index
                .get(&client_order_id)
                .expect("Order must be in the index")
                .clone();
            self.fill_limit_order(&order, LiquiditySide::Taker);
            return;
        }
        self.generate_order_updated(&client_order_id, quantity, Some(price), None);
    }

    fn update_stop_market_order(
        &mut self,
        order: &OrderAny,
        quantity: Quantity,
        trigger_price: Price,
    ) {
        let client_order_id = order.client_order_id();
        if self.index.is_stop_matched(order.order_side(), trigger_price) {
            self.generate_order_modify_rejected(
                order.trader_id(),
                order.strategy_id(),
                client_order_id,
                format!(
                    "{} {} order new stop px of {} was in the market: bid={}, ask={}",
                    order.order_type(),
                    order.order_side(),
                    trigger_price,
                    self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                    self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                ),
            );
            return;
        }

        self.generate_order_updated(&client_order_id, quantity, None, Some(trigger_price));
    }

    fn update_stop_limit_order(
        &mut self,
        order: &OrderAny,
        quantity: Quantity,
        price: Price,
        trigger_price: Price,
    ) {
        let client_order_id = order.client_order_id();
        if order.is_triggered().unwrap_or(false) {
            // Update the limit leg
            if self.index.is_limit_matched(order.order_side(), price) {
                if order.is_post_only() {
                    self.generate_order_modify_rejected(
                        order.trader_id(),
                        order.strategy_id(),
                        client_order_id,
                        format!(
                            "POST_ONLY {} {} order with new limit px of {} would have been a TAKER: bid={}, ask={}",
                            order.order_type(),
                            order.order_side(),
                            price,
                            self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                            self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                        ),
                    );
                    return;
                }
                self.generate_order_updated(&client_order_id, quantity, Some(price), None);
                let order = self
                    .index
                    .get(&client_order_id)
                    .expect("Order must be in the index")
                    .clone();
                self.fill_limit_order(&order, LiquiditySide::Taker);
                return; // Filled
            }
        } else {
            // Update the stop leg
            if self.index.is_stop_matched(order.order_side(), trigger_price) {
                self.generate_order_modify_rejected(
                    order.trader_id(),
                    order.strategy_id(),
                    client_order_id,
                    format!(
                        "{} {} order new stop px of {} was in the market: bid={}, ask={}",
                        order.order_type(),
                        order.order_side(),
                        trigger_price,
                        self.index.bid.map_or_else(|| "None".to_string(), |p| p.to_string()),
                        self.index.ask.map_or_else(|| "None".to_string(), |p| p.to_string()),
                    ),
                );
                return;
            }
        }

        self.generate_order_updated(&client_order_id, quantity, Some(price), Some(trigger_price));
    }

    // -- EVENT HANDLING --------------------------------------------------------------------------

    fn accept_order(&mut self, client_order_id: &ClientOrderId) {
        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index")
            .clone();
        if order.is_closed() {
            return;
        }
        if order.status() != OrderStatus::Accepted {
            let venue_order_id = self.get_venue_order_id(&order);
            self.generate_order_accepted(client_order_id, venue_order_id);
        }
        self.index.add_working(client_order_id);
    }

    fn expire_order(&mut self, client_order_id: &ClientOrderId) {
        self.generate_order_expired(client_order_id);

        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index")
            .clone();
        if self.config.support_contingent_orders && order.contingency_type().is_some() {
            self.cancel_contingent_orders(client_order_id);
        }
    }

    fn cancel_order(&mut self, client_order_id: &ClientOrderId, cancel_contingencies: bool) {
        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index")
            .clone();
        if order.is_closed() {
            return;
        }

        self.generate_order_canceled(client_order_id);

        if self.config.support_contingent_orders
            && order.contingency_type().is_some()
            && cancel_contingencies
        {
            self.cancel_contingent_orders(client_order_id);
        }
    }

    /// Applies the event to the order in the index, keeps the side lists in
    /// sync, then forwards the event to the registered execution client.
    fn apply_and_send(&mut self, event: OrderEventAny) {
        let client_order_id = event.client_order_id();
        if let Some(order) = self.index.get_mut(&client_order_id) {
            if let Err(e) = order.apply(event) {
                panic!("Failed to apply {} to {client_order_id}: {e}", event.kind());
            }
        }

        match &event {
            OrderEventAny::Updated(_) => self.index.reposition_working(&client_order_id),
            _ => {
                if self.order_closed(&client_order_id) {
                    self.index.remove_working(&client_order_id);
                }
            }
        }

        if let Some(client) = &self.exec_client {
            client.handle_order_event(event);
        }
    }

    // -- IDENTIFIERS -----------------------------------------------------------------------------

    fn account_id(&self) -> AccountId {
        self.exec_client
            .as_ref()
            .map_or_else(AccountId::default, |client| client.account_id())
    }

    fn get_venue_order_id(&mut self, order: &OrderAny) -> VenueOrderId {
        if let Some(venue_order_id) = order.venue_order_id() {
            return venue_order_id;
        }
        if let Some(venue_order_id) = self.cache.borrow().venue_order_id(&order.client_order_id()) {
            return venue_order_id;
        }
        let venue_order_id = self.ids.borrow_mut().generate_venue_order_id(self.raw_id);
        self.cache
            .borrow_mut()
            .add_venue_order_id(order.client_order_id(), venue_order_id);
        venue_order_id
    }

    /// Resolves the venue position ID for the order under the venue's OMS type.
    ///
    /// HEDGING assigns each order its own position (generating an ID when
    /// none is indexed); NETTING returns the at-most-one open position for
    /// the instrument, deferring ID creation to the first fill.
    fn get_position_id(&mut self, order: &OrderAny, generate: bool) -> Option<PositionId> {
        match self.oms_type {
            OmsType::Hedging => {
                if let Some(position_id) = order.position_id() {
                    return Some(position_id);
                }
                if let Some(position_id) =
                    self.cache.borrow().position_id(&order.client_order_id())
                {
                    return Some(position_id);
                }
                if generate {
                    Some(self.ids.borrow_mut().generate_venue_position_id(self.raw_id))
                } else {
                    None
                }
            }
            OmsType::Netting => {
                let cache = self.cache.borrow();
                let positions_open = cache.positions_open(Some(&self.instrument.id()));
                positions_open.first().map(|position| position.id)
            }
        }
    }

    fn position_for_order(&self, order: &OrderAny) -> Option<marketsim_model::position::Position> {
        let cache = self.cache.borrow();
        cache
            .position_for_order(&order.client_order_id())
            .cloned()
            .or_else(|| {
                if self.oms_type == OmsType::Netting {
                    cache
                        .positions_open(Some(&self.instrument.id()))
                        .first()
                        .map(|position| (*position).clone())
                } else {
                    None
                }
            })
    }

    fn position_exists(&self, order: &OrderAny, venue_position_id: Option<PositionId>) -> bool {
        match venue_position_id {
            Some(position_id) => self
                .cache
                .borrow()
                .position(&position_id)
                .is_some_and(marketsim_model::position::Position::is_open),
            None => self.position_for_order(order).is_some_and(|p| p.is_open()),
        }
    }

    /// Returns the current quantity of the position this order executes
    /// against (if any), looking through the venue position ID for HEDGING
    /// and the instrument's derived position for NETTING.
    fn position_quantity(
        &self,
        order: &OrderAny,
        venue_position_id: Option<PositionId>,
    ) -> Option<Quantity> {
        let cache = self.cache.borrow();
        match venue_position_id {
            Some(position_id) => cache.position(&position_id).map(|p| p.quantity),
            None => {
                let derived = PositionId::new(format!(
                    "{}-{}",
                    self.instrument.id(),
                    order.strategy_id()
                ));
                cache.position(&derived).map(|p| p.quantity)
            }
        }
    }

    // -- EVENT GENERATORS ------------------------------------------------------------------------

    fn order_ids(&self, client_order_id: &ClientOrderId) -> (TraderId, StrategyId, InstrumentId) {
        let order = self
            .index
            .get(client_order_id)
            .expect("Order must be in the index");
        (order.trader_id(), order.strategy_id(), order.instrument_id())
    }

    fn generate_order_submitted(&mut self, client_order_id: &ClientOrderId) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::Submitted(OrderSubmitted {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            account_id: self.account_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_rejected(&mut self, client_order_id: &ClientOrderId, reason: String) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::Rejected(OrderRejected {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            account_id: self.account_id(),
            reason: Ustr::from(reason.as_str()),
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_accepted(
        &mut self,
        client_order_id: &ClientOrderId,
        venue_order_id: VenueOrderId,
    ) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::Accepted(OrderAccepted {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            venue_order_id,
            account_id: self.account_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_pending_update(&mut self, client_order_id: &ClientOrderId) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let venue_order_id = self.index.get(client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::PendingUpdate(OrderPendingUpdate {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            venue_order_id,
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_pending_cancel(&mut self, client_order_id: &ClientOrderId) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let venue_order_id = self.index.get(client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::PendingCancel(OrderPendingCancel {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            venue_order_id,
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_modify_rejected(
        &mut self,
        trader_id: TraderId,
        strategy_id: StrategyId,
        client_order_id: ClientOrderId,
        reason: String,
    ) {
        let venue_order_id = self.index.get(&client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::ModifyRejected(OrderModifyRejected {
            trader_id,
            strategy_id,
            instrument_id: self.instrument.id(),
            client_order_id,
            venue_order_id,
            reason: Ustr::from(reason.as_str()),
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_cancel_rejected(
        &mut self,
        trader_id: TraderId,
        strategy_id: StrategyId,
        client_order_id: ClientOrderId,
        reason: String,
    ) {
        let venue_order_id = self.index.get(&client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::CancelRejected(OrderCancelRejected {
            trader_id,
            strategy_id,
            instrument_id: self.instrument.id(),
            client_order_id,
            venue_order_id,
            reason: Ustr::from(reason.as_str()),
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_updated(
        &mut self,
        client_order_id: &ClientOrderId,
        quantity: Quantity,
        price: Option<Price>,
        trigger_price: Option<Price>,
    ) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let venue_order_id = self.index.get(client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::Updated(OrderUpdated {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            venue_order_id,
            quantity,
            price,
            trigger_price,
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_canceled(&mut self, client_order_id: &ClientOrderId) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let venue_order_id = self.index.get(client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::Canceled(OrderCanceled {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            venue_order_id,
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_triggered(&mut self, client_order_id: &ClientOrderId) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let venue_order_id = self.index.get(client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::Triggered(OrderTriggered {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            venue_order_id,
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }

    fn generate_order_expired(&mut self, client_order_id: &ClientOrderId) {
        let (trader_id, strategy_id, instrument_id) = self.order_ids(client_order_id);
        let venue_order_id = self.index.get(client_order_id).and_then(|o| o.venue_order_id());
        let ts_now = self.clock.borrow().timestamp_ns();
        self.apply_and_send(OrderEventAny::Expired(OrderExpired {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id: *client_order_id,
            venue_order_id,
            ts_event: ts_now,
            ts_init: ts_now,
        }));
    }
}
