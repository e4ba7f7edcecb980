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

//! Order types for the trading domain model.
//!
//! Orders are event-sourced: all state mutation flows through
//! [`Order::apply`] with a lifecycle event, and the reachable statuses are
//! constrained by an explicit transition table.

pub mod any;
pub mod builder;
pub mod limit;
pub mod market;
pub mod stop_limit;
pub mod stop_market;

use enum_dispatch::enum_dispatch;
use marketsim_core::UnixNanos;
use serde::{Deserialize, Serialize};

pub use crate::orders::{
    any::OrderAny, builder::OrderTestBuilder, limit::LimitOrder, market::MarketOrder,
    stop_limit::StopLimitOrder, stop_market::StopMarketOrder,
};
use crate::{
    enums::{
        ContingencyType, LiquiditySide, OrderSide, OrderStatus, OrderType, PositionSide,
        TimeInForce,
    },
    events::{
        OrderAccepted, OrderCanceled, OrderEventAny, OrderExpired, OrderFilled, OrderRejected,
        OrderSubmitted, OrderUpdated,
    },
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
        VenueOrderId,
    },
    types::{Price, Quantity},
};

/// Errors from order domain operations.
#[derive(thiserror::Error, Debug)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(ClientOrderId),
    #[error("Invalid order state transition from {0} on {1}")]
    InvalidStateTransition(OrderStatus, &'static str),
    #[error("Order had no previous state")]
    NoPreviousState,
}

impl OrderStatus {
    /// Returns the resulting status for applying `event` in the current status.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError::InvalidStateTransition`] if the event is not
    /// valid in the current status.
    #[rustfmt::skip]
    pub fn transition(&self, event: &OrderEventAny) -> Result<Self, OrderError> {
        let new_status = match (self, event) {
            (Self::Initialized, OrderEventAny::Submitted(_)) => Self::Submitted,
            (Self::Submitted, OrderEventAny::Rejected(_)) => Self::Rejected,
            (Self::Submitted, OrderEventAny::Accepted(_)) => Self::Accepted,
            (Self::Submitted, OrderEventAny::Canceled(_)) => Self::Canceled,  // IOC/FOK and reduce-only cases
            (Self::Submitted, OrderEventAny::PendingUpdate(_)) => Self::PendingUpdate,  // Held contingent orders
            (Self::Submitted, OrderEventAny::PendingCancel(_)) => Self::PendingCancel,  // Held contingent orders
            (Self::Submitted, OrderEventAny::Updated(_)) => Self::Submitted,  // Reduce-only clip before accept
            (Self::Submitted, OrderEventAny::Filled(_)) => Self::Filled,  // Market orders have no accept
            (Self::Accepted, OrderEventAny::Rejected(_)) => Self::Rejected,  // StopLimit post-only violation
            (Self::Accepted, OrderEventAny::ModifyRejected(_)) => Self::Accepted,  // Sibling qty-sync rejection
            (Self::Triggered, OrderEventAny::ModifyRejected(_)) => Self::Triggered,  // Sibling qty-sync rejection
            (Self::PartiallyFilled, OrderEventAny::ModifyRejected(_)) => Self::PartiallyFilled,  // Sibling qty-sync rejection
            (Self::Accepted, OrderEventAny::PendingUpdate(_)) => Self::PendingUpdate,
            (Self::Accepted, OrderEventAny::PendingCancel(_)) => Self::PendingCancel,
            (Self::Accepted, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::Accepted, OrderEventAny::Triggered(_)) => Self::Triggered,
            (Self::Accepted, OrderEventAny::Expired(_)) => Self::Expired,
            (Self::Accepted, OrderEventAny::Updated(_)) => Self::Accepted,
            (Self::Accepted, OrderEventAny::Filled(_)) => Self::Filled,
            (Self::Triggered, OrderEventAny::Rejected(_)) => Self::Rejected,
            (Self::Triggered, OrderEventAny::PendingUpdate(_)) => Self::PendingUpdate,
            (Self::Triggered, OrderEventAny::PendingCancel(_)) => Self::PendingCancel,
            (Self::Triggered, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::Triggered, OrderEventAny::Expired(_)) => Self::Expired,
            (Self::Triggered, OrderEventAny::Updated(_)) => Self::Triggered,
            (Self::Triggered, OrderEventAny::Filled(_)) => Self::Filled,
            (Self::PendingUpdate, OrderEventAny::PendingUpdate(_)) => Self::PendingUpdate,  // Allow multiple requests
            (Self::PendingUpdate, OrderEventAny::PendingCancel(_)) => Self::PendingCancel,
            (Self::PendingUpdate, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::PendingUpdate, OrderEventAny::Expired(_)) => Self::Expired,
            (Self::PendingUpdate, OrderEventAny::Filled(_)) => Self::Filled,
            (Self::PendingCancel, OrderEventAny::PendingCancel(_)) => Self::PendingCancel,  // Allow multiple requests
            (Self::PendingCancel, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::PendingCancel, OrderEventAny::Filled(_)) => Self::Filled,
            (Self::PartiallyFilled, OrderEventAny::PendingUpdate(_)) => Self::PendingUpdate,
            (Self::PartiallyFilled, OrderEventAny::PendingCancel(_)) => Self::PendingCancel,
            (Self::PartiallyFilled, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::PartiallyFilled, OrderEventAny::Expired(_)) => Self::Expired,
            (Self::PartiallyFilled, OrderEventAny::Updated(_)) => Self::PartiallyFilled,
            (Self::PartiallyFilled, OrderEventAny::Filled(_)) => Self::Filled,
            _ => return Err(OrderError::InvalidStateTransition(*self, event.kind())),
        };
        Ok(new_status)
    }
}

/// The common interface over all order types.
#[enum_dispatch]
pub trait Order: 'static + Send {
    /// Returns a reference to the shared order state.
    fn core(&self) -> &OrderCore;
    /// Returns a mutable reference to the shared order state.
    fn core_mut(&mut self) -> &mut OrderCore;
    /// Returns the limit price (Limit/StopLimit) or `None`.
    fn price(&self) -> Option<Price>;
    /// Returns the stop/trigger price (StopMarket/StopLimit) or `None`.
    fn trigger_price(&self) -> Option<Price>;
    /// Returns the GTD expire time or `None`.
    fn expire_time(&self) -> Option<UnixNanos>;
    /// Returns `true` if the order must not take liquidity on arrival or update.
    fn is_post_only(&self) -> bool;
    /// Returns whether the stop leg has triggered (`None` for non-stop-limit orders).
    fn is_triggered(&self) -> Option<bool>;

    /// Applies a lifecycle `event` to the order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the event is invalid in the current status.
    fn apply(&mut self, event: OrderEventAny) -> Result<(), OrderError>;

    fn status(&self) -> OrderStatus {
        self.core().status
    }

    fn trader_id(&self) -> TraderId {
        self.core().trader_id
    }

    fn strategy_id(&self) -> StrategyId {
        self.core().strategy_id
    }

    fn instrument_id(&self) -> InstrumentId {
        self.core().instrument_id
    }

    fn client_order_id(&self) -> ClientOrderId {
        self.core().client_order_id
    }

    fn venue_order_id(&self) -> Option<VenueOrderId> {
        self.core().venue_order_id
    }

    fn position_id(&self) -> Option<PositionId> {
        self.core().position_id
    }

    fn account_id(&self) -> Option<AccountId> {
        self.core().account_id
    }

    fn order_side(&self) -> OrderSide {
        self.core().side
    }

    fn order_type(&self) -> OrderType {
        self.core().order_type
    }

    fn quantity(&self) -> Quantity {
        self.core().quantity
    }

    fn time_in_force(&self) -> TimeInForce {
        self.core().time_in_force
    }

    fn liquidity_side(&self) -> Option<LiquiditySide> {
        self.core().liquidity_side
    }

    fn is_reduce_only(&self) -> bool {
        self.core().is_reduce_only
    }

    fn contingency_type(&self) -> Option<ContingencyType> {
        self.core().contingency_type
    }

    fn linked_order_ids(&self) -> Option<&[ClientOrderId]> {
        self.core().linked_order_ids.as_deref()
    }

    fn parent_order_id(&self) -> Option<ClientOrderId> {
        self.core().parent_order_id
    }

    fn filled_qty(&self) -> Quantity {
        self.core().filled_qty
    }

    fn leaves_qty(&self) -> Quantity {
        self.core().leaves_qty
    }

    fn events(&self) -> &[OrderEventAny] {
        &self.core().events
    }

    fn ts_init(&self) -> UnixNanos {
        self.core().ts_init
    }

    fn ts_last(&self) -> UnixNanos {
        self.core().ts_last
    }

    fn is_buy(&self) -> bool {
        self.order_side() == OrderSide::Buy
    }

    fn is_sell(&self) -> bool {
        self.order_side() == OrderSide::Sell
    }

    fn is_passive(&self) -> bool {
        self.order_type() != OrderType::Market
    }

    fn is_aggressive(&self) -> bool {
        self.order_type() == OrderType::Market
    }

    fn is_open(&self) -> bool {
        matches!(
            self.status(),
            OrderStatus::Accepted
                | OrderStatus::Triggered
                | OrderStatus::PendingUpdate
                | OrderStatus::PendingCancel
                | OrderStatus::PartiallyFilled
        )
    }

    fn is_closed(&self) -> bool {
        matches!(
            self.status(),
            OrderStatus::Rejected
                | OrderStatus::Canceled
                | OrderStatus::Expired
                | OrderStatus::Filled
        )
    }

    fn set_liquidity_side(&mut self, liquidity_side: LiquiditySide) {
        self.core_mut().liquidity_side = Some(liquidity_side);
    }

    fn set_position_id(&mut self, position_id: Option<PositionId>) {
        self.core_mut().position_id = position_id;
    }

    /// Returns `true` if executing this order against a position of the given
    /// `side` and `position_qty` could only reduce the position.
    fn would_reduce_only(&self, side: PositionSide, position_qty: Quantity) -> bool {
        self.core().would_reduce_only(side, position_qty)
    }
}

/// The state shared by all order types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderCore {
    /// The lifecycle events applied to the order.
    pub events: Vec<OrderEventAny>,
    /// The status prior to the last applied event.
    pub previous_status: Option<OrderStatus>,
    /// The current order status.
    pub status: OrderStatus,
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub position_id: Option<PositionId>,
    pub account_id: Option<AccountId>,
    pub last_trade_id: Option<TradeId>,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub time_in_force: TimeInForce,
    pub liquidity_side: Option<LiquiditySide>,
    pub is_reduce_only: bool,
    pub contingency_type: Option<ContingencyType>,
    pub linked_order_ids: Option<Vec<ClientOrderId>>,
    pub parent_order_id: Option<ClientOrderId>,
    pub filled_qty: Quantity,
    pub leaves_qty: Quantity,
    pub avg_px: Option<f64>,
    pub ts_init: UnixNanos,
    pub ts_accepted: Option<UnixNanos>,
    pub ts_closed: Option<UnixNanos>,
    pub ts_last: UnixNanos,
}

impl OrderCore {
    /// Creates a new [`OrderCore`] instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        side: OrderSide,
        order_type: OrderType,
        quantity: Quantity,
        time_in_force: TimeInForce,
        is_reduce_only: bool,
        contingency_type: Option<ContingencyType>,
        linked_order_ids: Option<Vec<ClientOrderId>>,
        parent_order_id: Option<ClientOrderId>,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            events: Vec::new(),
            previous_status: None,
            status: OrderStatus::Initialized,
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            venue_order_id: None,
            position_id: None,
            account_id: None,
            last_trade_id: None,
            side,
            order_type,
            quantity,
            time_in_force,
            liquidity_side: None,
            is_reduce_only,
            contingency_type,
            linked_order_ids,
            parent_order_id,
            filled_qty: Quantity::zero(quantity.precision),
            leaves_qty: quantity,
            avg_px: None,
            ts_init,
            ts_accepted: None,
            ts_closed: None,
            ts_last: ts_init,
        }
    }

    /// Applies a lifecycle `event`, transitioning status and updating state.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the event is invalid in the current status.
    ///
    /// # Panics
    ///
    /// Panics if the event is for a different client order ID.
    pub fn apply(&mut self, event: OrderEventAny) -> Result<(), OrderError> {
        assert_eq!(self.client_order_id, event.client_order_id());

        let new_status = match (&self.status, &event) {
            // Resolving a pending state reverts to the prior working status
            (OrderStatus::PendingUpdate, OrderEventAny::Updated(_))
            | (OrderStatus::PendingUpdate, OrderEventAny::ModifyRejected(_))
            | (OrderStatus::PendingCancel, OrderEventAny::CancelRejected(_)) => {
                self.previous_status.ok_or(OrderError::NoPreviousState)?
            }
            _ => self.status.transition(&event)?,
        };
        self.previous_status = Some(self.status);
        self.status = new_status;

        match &event {
            OrderEventAny::Submitted(e) => self.submitted(e),
            OrderEventAny::Accepted(e) => self.accepted(e),
            OrderEventAny::Rejected(e) => self.rejected(e),
            OrderEventAny::PendingUpdate(_) | OrderEventAny::PendingCancel(_) => {}
            OrderEventAny::ModifyRejected(_) | OrderEventAny::CancelRejected(_) => {}
            OrderEventAny::Updated(e) => self.updated(e),
            OrderEventAny::Canceled(e) => self.canceled(e),
            OrderEventAny::Triggered(_) => {}
            OrderEventAny::Expired(e) => self.expired(e),
            OrderEventAny::Filled(e) => self.filled(e),
        }

        self.ts_last = event.ts_event();
        self.events.push(event);
        Ok(())
    }

    fn submitted(&mut self, event: &OrderSubmitted) {
        self.account_id = Some(event.account_id);
    }

    fn accepted(&mut self, event: &OrderAccepted) {
        self.venue_order_id = Some(event.venue_order_id);
        self.ts_accepted = Some(event.ts_event);
    }

    fn rejected(&mut self, event: &OrderRejected) {
        self.ts_closed = Some(event.ts_event);
    }

    fn canceled(&mut self, event: &OrderCanceled) {
        self.ts_closed = Some(event.ts_event);
    }

    fn expired(&mut self, event: &OrderExpired) {
        self.ts_closed = Some(event.ts_event);
    }

    fn updated(&mut self, event: &OrderUpdated) {
        if event.quantity != self.quantity {
            self.quantity = event.quantity;
            self.leaves_qty = self.quantity - self.filled_qty;
        }
    }

    fn filled(&mut self, event: &OrderFilled) {
        if self.filled_qty + event.last_qty < self.quantity {
            self.status = OrderStatus::PartiallyFilled;
        } else {
            self.status = OrderStatus::Filled;
            self.ts_closed = Some(event.ts_event);
        }

        self.set_avg_px(event.last_qty, event.last_px);

        self.venue_order_id = Some(event.venue_order_id);
        self.position_id = event.position_id.or(self.position_id);
        self.last_trade_id = Some(event.trade_id);
        self.liquidity_side = Some(event.liquidity_side);
        self.filled_qty += event.last_qty;
        self.leaves_qty -= event.last_qty;
        if self.ts_accepted.is_none() {
            // Time of first fill when no accept was emitted (market orders)
            self.ts_accepted = Some(event.ts_event);
        }
    }

    fn set_avg_px(&mut self, last_qty: Quantity, last_px: Price) {
        let prev_qty = self.filled_qty.as_f64();
        let total_qty = prev_qty + last_qty.as_f64();
        if total_qty == 0.0 {
            return;
        }
        let avg_px = self
            .avg_px
            .unwrap_or(last_px.as_f64())
            .mul_add(prev_qty, last_px.as_f64() * last_qty.as_f64())
            / total_qty;
        self.avg_px = Some(avg_px);
    }

    #[must_use]
    pub fn would_reduce_only(&self, side: PositionSide, position_qty: Quantity) -> bool {
        if side == PositionSide::Flat {
            return false;
        }

        match (self.side, side) {
            (OrderSide::Buy, PositionSide::Long) => false,
            (OrderSide::Buy, PositionSide::Short) => self.leaves_qty <= position_qty,
            (OrderSide::Sell, PositionSide::Short) => false,
            (OrderSide::Sell, PositionSide::Long) => self.leaves_qty <= position_qty,
            _ => true,
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
    use crate::events::{OrderFilledBuilder, OrderPendingUpdate};

    fn submitted_event(order: &OrderAny) -> OrderEventAny {
        OrderEventAny::Submitted(OrderSubmitted {
            trader_id: order.trader_id(),
            strategy_id: order.strategy_id(),
            instrument_id: order.instrument_id(),
            client_order_id: order.client_order_id(),
            account_id: AccountId::default(),
            ts_event: UnixNanos::from(1),
            ts_init: UnixNanos::from(1),
        })
    }

    fn accepted_event(order: &OrderAny) -> OrderEventAny {
        OrderEventAny::Accepted(OrderAccepted {
            trader_id: order.trader_id(),
            strategy_id: order.strategy_id(),
            instrument_id: order.instrument_id(),
            client_order_id: order.client_order_id(),
            venue_order_id: VenueOrderId::new("1-001"),
            account_id: AccountId::default(),
            ts_event: UnixNanos::from(2),
            ts_init: UnixNanos::from(2),
        })
    }

    fn filled_event(order: &OrderAny, last_qty: Quantity) -> OrderEventAny {
        OrderEventAny::Filled(
            OrderFilledBuilder::default()
                .instrument_id(order.instrument_id())
                .client_order_id(order.client_order_id())
                .order_side(order.order_side())
                .order_type(order.order_type())
                .last_qty(last_qty)
                .last_px(Price::from("1.00000"))
                .ts_event(UnixNanos::from(3))
                .build()
                .unwrap(),
        )
    }

    #[rstest]
    fn test_life_cycle_to_filled() {
        let mut order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .price(Price::from("1.00000"))
            .quantity(Quantity::from(100_000))
            .build();

        order.apply(submitted_event(&order)).unwrap();
        assert_eq!(order.status(), OrderStatus::Submitted);

        order.apply(accepted_event(&order)).unwrap();
        assert_eq!(order.status(), OrderStatus::Accepted);
        assert_eq!(order.venue_order_id(), Some(VenueOrderId::new("1-001")));
        assert!(order.is_open());

        order.apply(filled_event(&order, Quantity::from(100_000))).unwrap();
        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.filled_qty(), Quantity::from(100_000));
        assert_eq!(order.leaves_qty(), Quantity::from(0));
        assert!(order.is_closed());
        assert_eq!(order.events().len(), 3);
    }

    #[rstest]
    fn test_partial_fill_preserves_quantity_identity() {
        let mut order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .price(Price::from("1.00000"))
            .quantity(Quantity::from(100))
            .build();

        order.apply(submitted_event(&order)).unwrap();
        order.apply(accepted_event(&order)).unwrap();
        order.apply(filled_event(&order, Quantity::from(40))).unwrap();

        assert_eq!(order.status(), OrderStatus::PartiallyFilled);
        assert_eq!(order.filled_qty() + order.leaves_qty(), order.quantity());
        assert!(order.is_open());
    }

    #[rstest]
    fn test_pending_update_resolves_to_prior_status() {
        let mut order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .price(Price::from("1.00000"))
            .quantity(Quantity::from(100))
            .build();

        order.apply(submitted_event(&order)).unwrap();
        order.apply(accepted_event(&order)).unwrap();
        order
            .apply(OrderEventAny::PendingUpdate(OrderPendingUpdate {
                trader_id: order.trader_id(),
                strategy_id: order.strategy_id(),
                instrument_id: order.instrument_id(),
                client_order_id: order.client_order_id(),
                venue_order_id: order.venue_order_id(),
                ts_event: UnixNanos::from(3),
                ts_init: UnixNanos::from(3),
            }))
            .unwrap();
        assert_eq!(order.status(), OrderStatus::PendingUpdate);

        order
            .apply(OrderEventAny::Updated(OrderUpdated {
                trader_id: order.trader_id(),
                strategy_id: order.strategy_id(),
                instrument_id: order.instrument_id(),
                client_order_id: order.client_order_id(),
                venue_order_id: order.venue_order_id(),
                quantity: Quantity::from(50),
                price: Some(Price::from("0.99000")),
                trigger_price: None,
                ts_event: UnixNanos::from(4),
                ts_init: UnixNanos::from(4),
            }))
            .unwrap();
        assert_eq!(order.status(), OrderStatus::Accepted);
        assert_eq!(order.quantity(), Quantity::from(50));
        assert_eq!(order.leaves_qty(), Quantity::from(50));
        assert_eq!(order.price(), Some(Price::from("0.99000")));
    }

    #[rstest]
    fn test_invalid_transition_errors() {
        let mut order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .quantity(Quantity::from(100))
            .build();

        // Accept without submit is invalid
        let result = order.apply(accepted_event(&order));
        assert!(result.is_err());
    }

    #[rstest]
    #[case(OrderSide::Buy, PositionSide::Long, Quantity::from(50), false)]
    #[case(OrderSide::Buy, PositionSide::Short, Quantity::from(100), true)]
    #[case(OrderSide::Sell, PositionSide::Long, Quantity::from(100), true)]
    #[case(OrderSide::Sell, PositionSide::Short, Quantity::from(50), false)]
    #[case(OrderSide::Sell, PositionSide::Flat, Quantity::from(0), false)]
    fn test_would_reduce_only(
        #[case] side: OrderSide,
        #[case] position_side: PositionSide,
        #[case] position_qty: Quantity,
        #[case] expected: bool,
    ) {
        let order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .side(side)
            .quantity(Quantity::from(100))
            .build();
        assert_eq!(order.would_reduce_only(position_side, position_qty), expected);
    }

    #[rstest]
    fn test_avg_px_weighted_over_fills() {
        let mut order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .price(Price::from("2.00000"))
            .quantity(Quantity::from(20))
            .build();

        order.apply(submitted_event(&order)).unwrap();
        order.apply(accepted_event(&order)).unwrap();

        let fill1 = OrderFilledBuilder::default()
            .instrument_id(order.instrument_id())
            .client_order_id(order.client_order_id())
            .last_qty(Quantity::from(10))
            .last_px(Price::from("1.00000"))
            .build()
            .unwrap();
        let fill2 = OrderFilledBuilder::default()
            .instrument_id(order.instrument_id())
            .client_order_id(order.client_order_id())
            .trade_id(TradeId::new("2"))
            .last_qty(Quantity::from(10))
            .last_px(Price::from("2.00000"))
            .build()
            .unwrap();

        order.apply(OrderEventAny::Filled(fill1)).unwrap();
        order.apply(OrderEventAny::Filled(fill2)).unwrap();

        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.core().avg_px, Some(1.5));
    }
}
