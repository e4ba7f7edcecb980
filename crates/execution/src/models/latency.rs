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

use marketsim_core::nanos::DurationNanos;

/// A model for simulated round-trip command latency to the venue.
///
/// When configured on the venue, commands become visible to the matching
/// engine only once the simulated clock reaches their send time plus the
/// per-command-type latency.
#[derive(Clone, Copy, Debug)]
pub struct LatencyModel {
    /// The base latency applied to all commands.
    pub base_latency_nanos: DurationNanos,
    /// The latency for order submissions.
    pub insert_latency_nanos: DurationNanos,
    /// The latency for order modifications.
    pub update_latency_nanos: DurationNanos,
    /// The latency for order cancellations.
    pub delete_latency_nanos: DurationNanos,
}

impl LatencyModel {
    /// Creates a new [`LatencyModel`] instance.
    #[must_use]
    pub const fn new(
        base_latency_nanos: DurationNanos,
        insert_latency_nanos: DurationNanos,
        update_latency_nanos: DurationNanos,
        delete_latency_nanos: DurationNanos,
    ) -> Self {
        Self {
            base_latency_nanos,
            insert_latency_nanos,
            update_latency_nanos,
            delete_latency_nanos,
        }
    }
}
