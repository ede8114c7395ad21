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

//! Hall call panels.

use crate::dispatcher::{Assignment, Dispatcher};
use crate::error::DispatchError;
use crate::request::CallDirection;

/// Up/down call buttons on one floor.
///
/// A panel holds no elevator state. Pressing a button forwards a pickup
/// request to the dispatcher that owns the floor.
///
/// # Example
///
/// ```
/// use elevator_demo_rs::{Assignment, CarId, Dispatcher};
///
/// let mut dispatcher = Dispatcher::new(2, 10).unwrap();
/// let panel = dispatcher.floor(5).unwrap();
/// let assignment = panel.press_down(&mut dispatcher).unwrap();
/// assert_eq!(assignment, Assignment::Assigned(CarId(0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorPanel {
    number: u16,
}

impl FloorPanel {
    pub(crate) fn new(number: u16) -> Self {
        Self { number }
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn press(
        &self,
        dispatcher: &mut Dispatcher,
        direction: CallDirection,
    ) -> Result<Assignment, DispatchError> {
        dispatcher.request_pickup(self.number, direction)
    }

    pub fn press_up(&self, dispatcher: &mut Dispatcher) -> Result<Assignment, DispatchError> {
        self.press(dispatcher, CallDirection::Up)
    }

    pub fn press_down(&self, dispatcher: &mut Dispatcher) -> Result<Assignment, DispatchError> {
        self.press(dispatcher, CallDirection::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::CarId;

    #[test]
    fn press_forwards_pickup() {
        let mut dispatcher = Dispatcher::new(1, 6).unwrap();
        let panel = dispatcher.floor(4).unwrap();
        assert_eq!(panel.number(), 4);

        let assignment = panel.press_up(&mut dispatcher).unwrap();
        assert_eq!(assignment, Assignment::Assigned(CarId(0)));
        assert!(dispatcher.car(CarId(0)).unwrap().destinations().contains(&4));
    }
}
