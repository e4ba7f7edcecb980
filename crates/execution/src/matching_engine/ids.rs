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
use marketsim_model::identifiers::{PositionId, TradeId, VenueOrderId};

/// Generates the venue-assigned identifiers for a simulated venue.
///
/// Venue order IDs and venue position IDs count per instrument (keyed by the
/// instrument's 1-based registration index); execution IDs count globally
/// across the venue. The formats are stable so that replays with identical
/// inputs produce identical identifier sequences.
#[derive(Debug, Default)]
pub struct IdsGenerator {
    order_counts: IndexMap<u32, usize>,
    position_counts: IndexMap<u32, usize>,
    execution_count: usize,
}

impl IdsGenerator {
    /// Creates a new [`IdsGenerator`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        self.order_counts.clear();
        self.position_counts.clear();
        self.execution_count = 0;
    }

    /// Generates a new venue order ID for the instrument with registration
    /// index `raw_id`.
    pub fn generate_venue_order_id(&mut self, raw_id: u32) -> VenueOrderId {
        let count = self.order_counts.entry(raw_id).or_insert(0);
        *count += 1;
        VenueOrderId::new(format!("{raw_id}-{count:03}"))
    }

    /// Generates a new venue position ID for the instrument with registration
    /// index `raw_id`.
    pub fn generate_venue_position_id(&mut self, raw_id: u32) -> PositionId {
        let count = self.position_counts.entry(raw_id).or_insert(0);
        *count += 1;
        PositionId::new(format!("{raw_id}-{count:03}"))
    }

    /// Generates a new venue-global execution ID.
    pub fn generate_execution_id(&mut self) -> TradeId {
        self.execution_count += 1;
        TradeId::new(format!("{}", self.execution_count))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_venue_order_ids_count_per_instrument() {
        let mut ids = IdsGenerator::new();
        assert_eq!(ids.generate_venue_order_id(1), VenueOrderId::new("1-001"));
        assert_eq!(ids.generate_venue_order_id(1), VenueOrderId::new("1-002"));
        assert_eq!(ids.generate_venue_order_id(2), VenueOrderId::new("2-001"));
    }

    #[rstest]
    fn test_position_ids_count_per_instrument() {
        let mut ids = IdsGenerator::new();
        assert_eq!(ids.generate_venue_position_id(1), PositionId::new("1-001"));
        assert_eq!(ids.generate_venue_position_id(2), PositionId::new("2-001"));
        assert_eq!(ids.generate_venue_position_id(1), PositionId::new("1-002"));
    }

    #[rstest]
    fn test_execution_ids_count_globally() {
        let mut ids = IdsGenerator::new();
        assert_eq!(ids.generate_execution_id(), TradeId::new("1"));
        assert_eq!(ids.generate_execution_id(), TradeId::new("2"));

        ids.reset();
        assert_eq!(ids.generate_execution_id(), TradeId::new("1"));
        assert_eq!(ids.generate_venue_order_id(1), VenueOrderId::new("1-001"));
    }
}
