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

//! Car door.
//!
//! ```text
//!  Closed ──open──► Open ──close──► Closed
//! ```
//!
//! [`DoorState::Moving`] exists for status reporting but is never entered:
//! doors snap open and shut within a single tick.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Open,
    #[default]
    Closed,
    Moving,
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DoorState::Open => "OPEN",
            DoorState::Closed => "CLOSED",
            DoorState::Moving => "MOVING",
        };
        f.write_str(label)
    }
}

/// Door of a single car. Only the owning car mutates it.
#[derive(Debug, Clone, Default)]
pub struct Door {
    state: DoorState,
    /// Number of times the door has opened.
    openings: u64,
}

impl Door {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn openings(&self) -> u64 {
        self.openings
    }

    pub(crate) fn open(&mut self) {
        debug_assert_ne!(self.state, DoorState::Open, "door opened twice");
        self.state = DoorState::Open;
        self.openings += 1;
    }

    pub(crate) fn close(&mut self) {
        self.state = DoorState::Closed;
    }
}
