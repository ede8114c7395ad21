// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for dispatch operations.

use crate::base::CarId;
use thiserror::Error;

/// Dispatch errors.
///
/// Every rejected call leaves the dispatcher unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Floor is outside `0..floors`
    #[error("floor {floor} out of range (building has {floors} floors)")]
    FloorOutOfRange { floor: u16, floors: u16 },

    /// No car is registered under this id
    #[error("unknown car {0}")]
    UnknownCar(CarId),

    /// A dispatcher needs at least one car
    #[error("fleet must contain at least one car")]
    EmptyFleet,

    /// A dispatcher needs at least one floor
    #[error("building must have at least one floor")]
    NoFloors,

    /// Configured start floor does not exist
    #[error("start floor {floor} out of range (building has {floors} floors)")]
    StartFloorOutOfRange { floor: u16, floors: u16 },

    /// Same floor and direction already waiting in the queue
    #[error("duplicate queued request")]
    DuplicateRequest,
}

impl DispatchError {
    /// Returns `true` for errors caused by a malformed argument rather than by
    /// simulation state.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, DispatchError::DuplicateRequest)
    }
}
