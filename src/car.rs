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

//! Elevator car.
//!
//! Implemented State Machine
//!
//! ```text
//!          add_destination (above)          reach last stop
//!  Idle ──────────────────────────► MovingUp ───────────────► Idle
//!   │                                  ▲ │
//!   │ add_destination (below)  reverse │ │ reverse
//!   ▼                                  │ ▼
//!  MovingDown ◄────────────────────────┘
//! ```
//!
//! A car advances at most one floor per [`Car::step`]. When it stands on its
//! next stop the door cycles open and shut within the same step and the stop
//! is cleared.
//!
//! # Example
//!
//! ```
//! use elevator_demo_rs::{Car, CarId, Direction};
//!
//! let mut car = Car::new(CarId(0), 2);
//! car.add_destination(5);
//! assert_eq!(car.direction(), Direction::Up);
//!
//! for _ in 0..3 {
//!     car.step();
//! }
//! assert_eq!(car.current_floor(), 5);
//! assert!(car.is_idle());
//! ```

use crate::base::CarId;
use crate::door::{Door, DoorState};
use crate::request::Direction;
use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of a single [`Car::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarEvent {
    /// No pending stops.
    Idle,
    /// Travelled one floor without reaching a stop.
    Moved { from: u16, to: u16 },
    /// Served the stop at `floor`. `from` equals `floor` when the car was
    /// already standing there at the start of the step.
    Arrived { from: u16, floor: u16 },
}

#[derive(Debug, Clone)]
pub struct Car {
    id: CarId,
    current_floor: u16,
    direction: Direction,
    /// Pending stops, ascending.
    destinations: BTreeSet<u16>,
    door: Door,
}

impl Car {
    pub fn new(id: CarId, start_floor: u16) -> Self {
        Self {
            id,
            current_floor: start_floor,
            direction: Direction::None,
            destinations: BTreeSet::new(),
            door: Door::new(),
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn current_floor(&self) -> u16 {
        self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn door(&self) -> &Door {
        &self.door
    }

    pub fn door_state(&self) -> DoorState {
        self.door.state()
    }

    pub fn destinations(&self) -> &BTreeSet<u16> {
        &self.destinations
    }

    pub fn pending_count(&self) -> usize {
        self.destinations.len()
    }

    /// Returns `true` if the car has no stops and no direction.
    pub fn is_idle(&self) -> bool {
        self.destinations.is_empty() && self.direction == Direction::None
    }

    /// Adds a stop at `floor`.
    ///
    /// Returns `false` if the stop was already pending, in which case nothing
    /// changes. A car without a direction is oriented toward the new stop.
    pub fn add_destination(&mut self, floor: u16) -> bool {
        if !self.destinations.insert(floor) {
            return false;
        }
        if self.direction == Direction::None {
            self.direction = Direction::toward(self.current_floor, floor);
        }
        debug!(car = %self.id, floor, direction = %self.direction, "added destination");
        self.assert_invariants();
        true
    }

    /// Advances the car by one tick.
    pub fn step(&mut self) -> CarEvent {
        let Some(next) = self.next_stop() else {
            self.direction = Direction::None;
            return CarEvent::Idle;
        };

        let from = self.current_floor;
        if from != next {
            if from < next {
                self.current_floor += 1;
                self.direction = Direction::Up;
            } else {
                self.current_floor -= 1;
                self.direction = Direction::Down;
            }
            debug!(car = %self.id, from, to = self.current_floor, direction = %self.direction, "moved");

            if self.current_floor != next {
                self.assert_invariants();
                return CarEvent::Moved {
                    from,
                    to: self.current_floor,
                };
            }
        }

        self.serve(next);
        CarEvent::Arrived { from, floor: next }
    }

    /// Nearest pending stop in travel order: the closest stop at or ahead of
    /// the car, or the closest one behind it when nothing is left ahead. A
    /// car without a direction looks upward first.
    fn next_stop(&self) -> Option<u16> {
        let floor = self.current_floor;
        match self.direction {
            Direction::Down => self
                .destinations
                .range(..=floor)
                .next_back()
                .or_else(|| self.destinations.first())
                .copied(),
            Direction::Up | Direction::None => self
                .destinations
                .range(floor..)
                .next()
                .or_else(|| self.destinations.last())
                .copied(),
        }
    }

    fn serve(&mut self, floor: u16) {
        self.door.open();
        self.destinations.remove(&floor);
        debug!(car = %self.id, floor, "door opened, stop served");
        self.door.close();
        self.direction = match self.next_stop() {
            Some(next) => Direction::toward(self.current_floor, next),
            None => Direction::None,
        };
        self.assert_invariants();
    }

    fn assert_invariants(&self) {
        debug_assert!(
            !self.destinations.is_empty() || self.direction == Direction::None,
            "Invariant violated: car {} has direction {} but no stops",
            self.id,
            self.direction
        );
        debug_assert!(
            self.direction != Direction::None
                || self.destinations.iter().all(|&f| f == self.current_floor),
            "Invariant violated: car {} has no direction but stops away from floor {}: {:?}",
            self.id,
            self.current_floor,
            self.destinations
        );
    }
}
