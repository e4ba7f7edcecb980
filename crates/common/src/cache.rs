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

//! A common in-memory cache for execution state.
//!
//! The cache owns positions and the account; the matching engine reads them
//! and mutation happens indirectly through the execution client applying
//! emitted fill events. Insertion-ordered maps keep every iteration which can
//! affect emitted output deterministic.

use indexmap::IndexMap;
use marketsim_model::{
    accounts::Account,
    identifiers::{ClientOrderId, InstrumentId, PositionId, VenueOrderId},
    instruments::{Instrument, InstrumentAny},
    position::Position,
};

/// A common in-memory cache of instruments, positions and account state.
#[derive(Debug, Default)]
pub struct Cache {
    account: Option<Account>,
    instruments: IndexMap<InstrumentId, InstrumentAny>,
    positions: IndexMap<PositionId, Position>,
    position_ids: IndexMap<ClientOrderId, PositionId>,
    venue_order_ids: IndexMap<ClientOrderId, VenueOrderId>,
}

impl Cache {
    /// Creates a new empty [`Cache`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state from the cache.
    pub fn reset(&mut self) {
        self.account = None;
        self.positions.clear();
        self.position_ids.clear();
        self.venue_order_ids.clear();
        log::info!("Reset cache");
    }

    // -- ACCOUNT ---------------------------------------------------------------------------------

    /// Adds (or replaces) the `account` in the cache.
    pub fn add_account(&mut self, account: Account) {
        self.account = Some(account);
    }

    /// Returns a reference to the cached account (if any).
    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// Returns a mutable reference to the cached account (if any).
    #[must_use]
    pub fn account_mut(&mut self) -> Option<&mut Account> {
        self.account.as_mut()
    }

    // -- INSTRUMENTS -----------------------------------------------------------------------------

    /// Adds the `instrument` to the cache.
    pub fn add_instrument(&mut self, instrument: InstrumentAny) {
        self.instruments.insert(instrument.id(), instrument);
    }

    /// Returns the instrument for the given `instrument_id` (if found).
    #[must_use]
    pub fn instrument(&self, instrument_id: &InstrumentId) -> Option<&InstrumentAny> {
        self.instruments.get(instrument_id)
    }

    // -- POSITIONS -------------------------------------------------------------------------------

    /// Adds (or replaces) the `position` in the cache.
    pub fn add_position(&mut self, position: Position) {
        self.positions.insert(position.id, position);
    }

    /// Returns the position for the given `position_id` (if found).
    #[must_use]
    pub fn position(&self, position_id: &PositionId) -> Option<&Position> {
        self.positions.get(position_id)
    }

    /// Returns a mutable reference to the position for the given `position_id`.
    #[must_use]
    pub fn position_mut(&mut self, position_id: &PositionId) -> Option<&mut Position> {
        self.positions.get_mut(position_id)
    }

    /// Returns all open positions, optionally filtered by `instrument_id`,
    /// in insertion order.
    #[must_use]
    pub fn positions_open(&self, instrument_id: Option<&InstrumentId>) -> Vec<&Position> {
        self.positions
            .values()
            .filter(|p| p.is_open())
            .filter(|p| instrument_id.is_none() || instrument_id == Some(&p.instrument_id))
            .collect()
    }

    /// Indexes the `position_id` for the given `client_order_id`.
    pub fn add_position_id(&mut self, position_id: PositionId, client_order_id: ClientOrderId) {
        self.position_ids.insert(client_order_id, position_id);
    }

    /// Returns the position ID indexed for the given `client_order_id` (if found).
    #[must_use]
    pub fn position_id(&self, client_order_id: &ClientOrderId) -> Option<PositionId> {
        self.position_ids.get(client_order_id).copied()
    }

    /// Returns the position associated with the given `client_order_id` (if any).
    #[must_use]
    pub fn position_for_order(&self, client_order_id: &ClientOrderId) -> Option<&Position> {
        self.position_id(client_order_id)
            .and_then(|position_id| self.positions.get(&position_id))
    }

    // -- ORDER IDENTIFIERS -----------------------------------------------------------------------

    /// Indexes the `venue_order_id` for the given `client_order_id`.
    pub fn add_venue_order_id(
        &mut self,
        client_order_id: ClientOrderId,
        venue_order_id: VenueOrderId,
    ) {
        self.venue_order_ids.insert(client_order_id, venue_order_id);
    }

    /// Returns the venue order ID indexed for the given `client_order_id` (if found).
    #[must_use]
    pub fn venue_order_id(&self, client_order_id: &ClientOrderId) -> Option<VenueOrderId> {
        self.venue_order_ids.get(client_order_id).copied()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use marketsim_model::{
        events::OrderFilledBuilder,
        instruments::stubs::crypto_perpetual_ethusdt,
        types::{Price, Quantity},
    };
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_instruments() {
        let mut cache = Cache::new();
        let instrument = InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt());
        let instrument_id = instrument.id();
        cache.add_instrument(instrument);

        assert!(cache.instrument(&instrument_id).is_some());
        assert!(cache.instrument(&InstrumentId::from("AUD/USD.SIM")).is_none());
    }

    #[rstest]
    fn test_positions_open_filter() {
        let mut cache = Cache::new();
        let instrument = InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt());
        let fill = OrderFilledBuilder::default()
            .instrument_id(instrument.id())
            .last_qty(Quantity::from("1.000"))
            .last_px(Price::from("1500.00"))
            .build()
            .unwrap();
        let position = Position::new(&instrument, PositionId::new("1-001"), &fill);
        cache.add_position(position);

        assert_eq!(cache.positions_open(None).len(), 1);
        assert_eq!(cache.positions_open(Some(&instrument.id())).len(), 1);
        assert!(cache
            .positions_open(Some(&InstrumentId::from("AUD/USD.SIM")))
            .is_empty());
    }

    #[rstest]
    fn test_identifier_indexes() {
        let mut cache = Cache::new();
        let client_order_id = ClientOrderId::new("O-1");
        cache.add_position_id(PositionId::new("1-001"), client_order_id);
        cache.add_venue_order_id(client_order_id, VenueOrderId::new("1-001"));

        assert_eq!(cache.position_id(&client_order_id), Some(PositionId::new("1-001")));
        assert_eq!(cache.venue_order_id(&client_order_id), Some(VenueOrderId::new("1-001")));

        cache.reset();
        assert_eq!(cache.position_id(&client_order_id), None);
    }
}
