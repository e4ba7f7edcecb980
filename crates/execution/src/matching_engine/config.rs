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

/// Configuration for `OrderMatchingEngine` instances.
#[derive(Debug, Clone)]
pub struct OrderMatchingEngineConfig {
    /// Whether bars drive matching (L1 books only).
    pub bar_execution: bool,
    /// Whether stop orders whose trigger is already in the market are rejected.
    pub reject_stop_orders: bool,
    /// Whether GTD expirations are processed.
    pub support_gtd_orders: bool,
    /// Whether OTO/OCO contingent orders are processed.
    pub support_contingent_orders: bool,
    /// Whether reduce-only instructions are enforced.
    pub use_reduce_only: bool,
}

impl OrderMatchingEngineConfig {
    /// Creates a new [`OrderMatchingEngineConfig`] instance.
    #[must_use]
    pub const fn new(
        bar_execution: bool,
        reject_stop_orders: bool,
        support_gtd_orders: bool,
        support_contingent_orders: bool,
        use_reduce_only: bool,
    ) -> Self {
        Self {
            bar_execution,
            reject_stop_orders,
            support_gtd_orders,
            support_contingent_orders,
            use_reduce_only,
        }
    }
}

impl Default for OrderMatchingEngineConfig {
    /// Creates a new default [`OrderMatchingEngineConfig`] instance.
    fn default() -> Self {
        Self {
            bar_execution: true,
            reject_stop_orders: true,
            support_gtd_orders: true,
            support_contingent_orders: true,
            use_reduce_only: true,
        }
    }
}
