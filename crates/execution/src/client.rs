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

//! The execution client contract binding a venue to its event consumer.

use marketsim_core::UnixNanos;
use marketsim_model::{
    events::OrderEventAny,
    identifiers::{AccountId, Venue},
    types::AccountBalance,
};

/// The sink for all events emitted by a simulated venue.
///
/// Must be registered with the venue before any operation which emits events.
/// Implementations take `&self` and use interior mutability where they apply
/// state changes (positions, account) as a consequence of events.
pub trait ExecutionClient {
    /// Returns the account ID for the client.
    fn account_id(&self) -> AccountId;

    /// Returns the venue the client is bound to.
    fn venue(&self) -> Venue;

    /// Generates a fresh account state event from the given `balances`.
    ///
    /// # Errors
    ///
    /// Returns an error if no account exists for the client.
    fn generate_account_state(
        &self,
        balances: Vec<AccountBalance>,
        reported: bool,
        ts_event: UnixNanos,
    ) -> anyhow::Result<()>;

    /// Handles an order lifecycle `event` emitted by the venue.
    fn handle_order_event(&self, event: OrderEventAny);
}
