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

//! Travel directions and dispatch requests.
//!
//! A [`Request`] is a hall call: a pickup at a floor, heading
//! [`Up`](Direction::Up) or [`Down`](Direction::Down). In-car floor
//! selections go straight to the car's stop set and are never queued.

use crate::base::RequestId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Travel direction of a car, or the direction attached to a request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    None,
}

impl Direction {
    /// Direction to travel from `from` to reach `to`.
    pub fn toward(from: u16, to: u16) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::None => "NONE",
        };
        f.write_str(label)
    }
}

/// Direction of a hall call button.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Up,
    Down,
}

impl From<CallDirection> for Direction {
    fn from(direction: CallDirection) -> Self {
        match direction {
            CallDirection::Up => Direction::Up,
            CallDirection::Down => Direction::Down,
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Direction::from(*self), f)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    id: RequestId,
    floor: u16,
    direction: Direction,
}

impl Request {
    /// Hall call at `floor`.
    pub fn pickup(id: RequestId, floor: u16, direction: CallDirection) -> Self {
        Self {
            id,
            floor,
            direction: direction.into(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn floor(&self) -> u16 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Floor/direction pair identifying the call, ignoring the request id.
    pub fn call(&self) -> (u16, Direction) {
        (self.floor, self.direction)
    }
}
