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
use serde::{Deserialize, Serialize};

use super::{Order, OrderCore, OrderError};
use crate::{
    enums::{ContingencyType, OrderSide, OrderType, TimeInForce},
    events::OrderEventAny,
    identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId},
    types::{Price, Quantity},
};

/// An order to buy or sell at a specific price or better.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitOrder {
    pub core: OrderCore,
    /// The order limit price.
    pub price: Price,
    /// The order expiration (for GTD orders).
    pub expire_time: Option<UnixNanos>,
    /// Whether the order must provide liquidity only.
    pub is_post_only: bool,
}

impl LimitOrder {
    /// Creates a new [`LimitOrder`] instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
        time_in_force: TimeInForce,
        expire_time: Option<UnixNanos>,
        is_post_only: bool,
        is_reduce_only: bool,
        contingency_type: Option<ContingencyType>,
        linked_order_ids: Option<Vec<ClientOrderId>>,
        parent_order_id: Option<ClientOrderId>,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            core: OrderCore::new(
                trader_id,
                strategy_id,
                instrument_id,
                client_order_id,
                side,
                OrderType::Limit,
                quantity,
                time_in_force,
                is_reduce_only,
                contingency_type,
                linked_order_ids,
                parent_order_id,
                ts_init,
            ),
            price,
            expire_time,
            is_post_only,
        }
    }
}

impl Order for LimitOrder {
    fn core(&self) -> &OrderCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OrderCore {
        &mut self.core
    }

    fn price(&self) -> Option<Price> {
        Some(self.price)
    }

    fn trigger_price(&self) -> Option<Price> {
        None
    }

    fn expire_time(&self) -> Option<UnixNanos> {
        self.expire_time
    }

    fn is_post_only(&self) -> bool {
        self.is_post_only
    }

    fn is_triggered(&self) -> Option<bool> {
        None
    }

    fn apply(&mut self, event: OrderEventAny) -> Result<(), OrderError> {
        if let OrderEventAny::Updated(ref updated) = event {
            if let Some(price) = updated.price {
                self.price = price;
            }
        }
        self.core.apply(event)
    }
}
