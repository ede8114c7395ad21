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

//! Read-only snapshots of the simulation.

use crate::base::CarId;
use crate::car::Car;
use crate::door::DoorState;
use crate::request::Direction;
use serde::Serialize;
use std::fmt;

/// Snapshot of one car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarStatus {
    pub id: CarId,
    pub current_floor: u16,
    pub direction: Direction,
    pub door: DoorState,
    /// Pending stops, ascending.
    pub pending: Vec<u16>,
}

impl From<&Car> for CarStatus {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id(),
            current_floor: car.current_floor(),
            direction: car.direction(),
            door: car.door_state(),
            pending: car.destinations().iter().copied().collect(),
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Car {} at floor {} going {}, door {}, next stops {:?}",
            self.id, self.current_floor, self.direction, self.door, self.pending
        )
    }
}

/// Snapshot of the whole system after a given tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    pub tick: u64,
    pub cars: Vec<CarStatus>,
    /// Requests waiting for a car.
    pub queued: usize,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Elevator System Status (tick {}) =====", self.tick)?;
        for car in &self.cars {
            writeln!(f, "{car}")?;
        }
        write!(f, "Queued requests: {}", self.queued)
    }
}
