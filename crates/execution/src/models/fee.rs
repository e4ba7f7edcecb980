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

use marketsim_model::{
    enums::LiquiditySide,
    instruments::{Instrument, InstrumentAny},
    orders::OrderAny,
    types::{Money, Price, Quantity},
};
use rust_decimal::prelude::ToPrimitive;

/// A model for calculating the commission generated by an execution.
pub trait FeeModel {
    /// Calculates the commission for a fill of `last_qty` at `last_px` with
    /// the given `liquidity_side`.
    ///
    /// # Errors
    ///
    /// Returns an error if a fee rate cannot be represented as `f64`.
    fn get_commission(
        &self,
        order: &OrderAny,
        last_qty: Quantity,
        last_px: Price,
        liquidity_side: LiquiditySide,
        instrument: &InstrumentAny,
    ) -> anyhow::Result<Money>;
}

/// A fee model charging the instrument's maker/taker rates on notional value.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakerTakerFeeModel;

impl FeeModel for MakerTakerFeeModel {
    fn get_commission(
        &self,
        _order: &OrderAny,
        last_qty: Quantity,
        last_px: Price,
        liquidity_side: LiquiditySide,
        instrument: &InstrumentAny,
    ) -> anyhow::Result<Money> {
        let fee_rate = match liquidity_side {
            LiquiditySide::Maker => instrument.maker_fee(),
            LiquiditySide::Taker => instrument.taker_fee(),
        };
        let fee_rate = fee_rate
            .to_f64()
            .ok_or_else(|| anyhow::anyhow!("Fee rate could not be represented as `f64`"))?;
        let notional = last_qty.as_f64() * instrument.multiplier().as_f64() * last_px.as_f64();
        Ok(Money::new(notional * fee_rate, instrument.quote_currency()))
    }
}

/// A fee model charging a fixed commission per fill.
#[derive(Clone, Copy, Debug)]
pub struct FixedFeeModel {
    commission: Money,
}

impl FixedFeeModel {
    /// Creates a new [`FixedFeeModel`] instance.
    #[must_use]
    pub const fn new(commission: Money) -> Self {
        Self { commission }
    }
}

impl FeeModel for FixedFeeModel {
    fn get_commission(
        &self,
        _order: &OrderAny,
        _last_qty: Quantity,
        _last_px: Price,
        _liquidity_side: LiquiditySide,
        _instrument: &InstrumentAny,
    ) -> anyhow::Result<Money> {
        Ok(self.commission)
    }
}

/// A tagged union over all fee model types.
#[derive(Clone, Copy, Debug)]
pub enum FeeModelAny {
    MakerTaker(MakerTakerFeeModel),
    Fixed(FixedFeeModel),
}

impl FeeModel for FeeModelAny {
    fn get_commission(
        &self,
        order: &OrderAny,
        last_qty: Quantity,
        last_px: Price,
        liquidity_side: LiquiditySide,
        instrument: &InstrumentAny,
    ) -> anyhow::Result<Money> {
        match self {
            Self::MakerTaker(model) => {
                model.get_commission(order, last_qty, last_px, liquidity_side, instrument)
            }
            Self::Fixed(model) => {
                model.get_commission(order, last_qty, last_px, liquidity_side, instrument)
            }
        }
    }
}

impl Default for FeeModelAny {
    fn default() -> Self {
        Self::MakerTaker(MakerTakerFeeModel)
    }
}
