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

//! Represents a position in a market, built up from order fill events.

use std::fmt::Display;

use marketsim_core::UnixNanos;
use serde::{Deserialize, Serialize};

use crate::{
    enums::{OrderSide, PositionSide},
    events::OrderFilled,
    identifiers::{InstrumentId, PositionId, StrategyId, TradeId},
    instruments::{Instrument, InstrumentAny},
    types::Quantity,
};

/// Represents a position in a market.
///
/// The position quantity is the absolute exposure; `signed_qty` is positive
/// for long and negative for short.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    /// The position ID.
    pub id: PositionId,
    /// The instrument ID for the position.
    pub instrument_id: InstrumentId,
    /// The strategy ID associated with the position.
    pub strategy_id: StrategyId,
    /// The current position side.
    pub side: PositionSide,
    /// The current absolute position quantity.
    pub quantity: Quantity,
    /// The current signed position quantity (positive long, negative short).
    pub signed_qty: f64,
    /// The position size decimal precision.
    pub size_precision: u8,
    /// The trade match IDs of the fills applied to the position.
    pub trade_ids: Vec<TradeId>,
    /// UNIX timestamp (nanoseconds) when the position was opened.
    pub ts_opened: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the position was closed (if closed).
    pub ts_closed: Option<UnixNanos>,
    /// UNIX timestamp (nanoseconds) of the last position event.
    pub ts_last: UnixNanos,
}

impl Position {
    /// Creates a new [`Position`] instance from the opening `fill`.
    ///
    /// # Panics
    ///
    /// Panics if the fill carries no position ID.
    #[must_use]
    pub fn new(instrument: &InstrumentAny, id: PositionId, fill: &OrderFilled) -> Self {
        let mut position = Self {
            id,
            instrument_id: instrument.id(),
            strategy_id: fill.strategy_id,
            side: PositionSide::Flat,
            quantity: Quantity::zero(instrument.size_precision()),
            signed_qty: 0.0,
            size_precision: instrument.size_precision(),
            trade_ids: Vec::new(),
            ts_opened: fill.ts_event,
            ts_closed: None,
            ts_last: fill.ts_event,
        };
        position.apply(fill);
        position
    }

    /// Applies the `fill` to the position, updating side and quantity.
    pub fn apply(&mut self, fill: &OrderFilled) {
        let last_qty = fill.last_qty.as_f64();
        match fill.order_side {
            OrderSide::Buy => self.signed_qty += last_qty,
            OrderSide::Sell => self.signed_qty -= last_qty,
        }
        // Clamp float noise at the flat boundary
        if self.signed_qty.abs() < 10f64.powi(-i32::from(self.size_precision)) / 2.0 {
            self.signed_qty = 0.0;
        }

        self.quantity = Quantity::new(self.signed_qty.abs(), self.size_precision);
        self.side = if self.signed_qty > 0.0 {
            PositionSide::Long
        } else if self.signed_qty < 0.0 {
            PositionSide::Short
        } else {
            PositionSide::Flat
        };

        self.trade_ids.push(fill.trade_id);
        self.ts_last = fill.ts_event;
        if self.side == PositionSide::Flat {
            self.ts_closed = Some(fill.ts_event);
        } else {
            self.ts_closed = None;
        }
    }

    /// Returns `true` if the position side is long.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    /// Returns `true` if the position side is short.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    /// Returns `true` if the position is open (non-flat).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.side != PositionSide::Flat
    }

    /// Returns `true` if the position is closed (flat).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.side == PositionSide::Flat
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(id={}, instrument_id={}, side={}, quantity={})",
            stringify!(Position),
            self.id,
            self.instrument_id,
            self.side,
            self.quantity,
        )
    }
}
