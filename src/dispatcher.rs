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

//! Elevator dispatcher.
//!
//! The [`Dispatcher`] is the central component that owns the fleet and the
//! floor panels, assigns incoming requests to cars, and advances the
//! simulation one tick at a time.
//!
//! # Car Selection
//!
//! - The first idle car in registration order wins.
//! - Otherwise the car with the fewest pending stops wins, ties going to the
//!   earlier-registered car.
//!
//! Selection ignores the requested direction: a down call may go to a car
//! travelling up.
//!
//! # Ticks
//!
//! Nothing moves between calls to [`Dispatcher::step`]. Each step advances
//! every car once, then retries queued requests in arrival order.

use crate::base::{CarId, RequestSequence};
use crate::car::{Car, CarEvent};
use crate::config::DispatcherConfig;
use crate::floor::FloorPanel;
use crate::request::{CallDirection, Request};
use crate::status::{CarStatus, SystemStatus};
use crate::{DispatchError, RequestId, RequestQueue};
use std::num::NonZeroUsize;
use tracing::{debug, info, warn};

/// Where a pickup request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Added as a stop on this car.
    Assigned(CarId),
    /// No car could take it yet; waiting in the queue.
    Queued(RequestId),
}

/// What happened during one [`Dispatcher::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// One event per car, in registration order.
    pub events: Vec<(CarId, CarEvent)>,
    /// Queued requests handed to a car at the end of the tick.
    pub assigned_from_queue: usize,
}

/// Elevator dispatcher owning the fleet, the floors, and the pending queue.
///
/// # Invariants
///
/// - The fleet and the floor set are fixed at construction.
/// - Every queued request is a floor/direction pair queued exactly once,
///   at a floor no car currently stops at.
/// - Rejected calls leave the dispatcher unchanged.
#[derive(Debug)]
pub struct Dispatcher {
    /// Cars indexed by [`CarId`].
    cars: Vec<Car>,
    floors: Vec<FloorPanel>,
    queue: RequestQueue,
    requests: RequestSequence,
    tick: u64,
    max_stops_per_car: Option<NonZeroUsize>,
}

impl Dispatcher {
    /// Creates a dispatcher with `num_cars` cars on floor 0 and `num_floors`
    /// floors.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyFleet`] - `num_cars` is zero.
    /// - [`DispatchError::NoFloors`] - `num_floors` is zero.
    pub fn new(num_cars: u16, num_floors: u16) -> Result<Self, DispatchError> {
        Self::with_config(&DispatcherConfig::new(num_cars, num_floors))
    }

    pub fn with_config(config: &DispatcherConfig) -> Result<Self, DispatchError> {
        config.validate()?;

        let cars = (0..config.cars)
            .map(|id| Car::new(CarId(id), config.start_floor))
            .collect();
        let floors = (0..config.floors).map(FloorPanel::new).collect();
        info!(
            cars = config.cars,
            floors = config.floors,
            start_floor = config.start_floor,
            "dispatcher ready"
        );

        Ok(Self {
            cars,
            floors,
            queue: RequestQueue::new(),
            requests: RequestSequence::new(),
            tick: 0,
            max_stops_per_car: config.max_stops_per_car,
        })
    }

    /// Handles a hall call at `floor`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::FloorOutOfRange`] - Floor does not exist.
    /// - [`DispatchError::DuplicateRequest`] - The same call is already queued.
    pub fn request_pickup(
        &mut self,
        floor: u16,
        direction: CallDirection,
    ) -> Result<Assignment, DispatchError> {
        self.check_floor(floor)?;
        if self.queue.contains(floor, direction.into()) {
            return Err(DispatchError::DuplicateRequest);
        }

        let request = Request::pickup(self.requests.next_id(), floor, direction);
        info!(request = %request.id(), floor, %direction, "pickup requested");

        if let Some(car) = assign(&mut self.cars, self.max_stops_per_car, &request) {
            self.drop_covered_calls(floor);
            return Ok(Assignment::Assigned(car));
        }

        // Checked above, so the push cannot hit a duplicate.
        self.queue.push(request)?;
        warn!(request = %request.id(), floor, queued = self.queue.len(), "all cars busy, request queued");
        Ok(Assignment::Queued(request.id()))
    }

    /// Adds a stop chosen from inside `car_id`, bypassing car selection.
    /// Queued hall calls at that floor are dropped, since the car now serves
    /// them.
    ///
    /// Returns `false` if the car already had that stop.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownCar`] - No such car.
    /// - [`DispatchError::FloorOutOfRange`] - Floor does not exist.
    pub fn select_destination(&mut self, car_id: CarId, floor: u16) -> Result<bool, DispatchError> {
        self.check_floor(floor)?;
        let car = self
            .cars
            .get_mut(car_id.index())
            .ok_or(DispatchError::UnknownCar(car_id))?;

        info!(car = %car_id, floor, "destination selected");
        if !car.add_destination(floor) {
            return Ok(false);
        }
        self.drop_covered_calls(floor);
        Ok(true)
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> TickReport {
        self.tick += 1;

        let events = self
            .cars
            .iter_mut()
            .map(|car| (car.id(), car.step()))
            .collect();

        let assigned_from_queue = if self.queue.is_empty() {
            0
        } else {
            let cars = &mut self.cars;
            let limit = self.max_stops_per_car;
            self.queue.retain_unassigned(|request| {
                is_covered(cars, request.floor()) || assign(cars, limit, request).is_some()
            })
        };

        debug!(
            tick = self.tick,
            assigned_from_queue,
            queued = self.queue.len(),
            "tick complete"
        );

        TickReport {
            tick: self.tick,
            events,
            assigned_from_queue,
        }
    }

    /// Steps until every car is idle and the queue is empty, or until
    /// `max_ticks` ticks have run. Returns the number of ticks run.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && !self.is_idle() {
            self.step();
            ran += 1;
        }
        ran
    }

    /// Returns `true` when no car has work and nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.cars.iter().all(Car::is_idle)
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            tick: self.tick,
            cars: self.cars.iter().map(CarStatus::from).collect(),
            queued: self.queue.len(),
        }
    }

    /// Panel for `floor`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::FloorOutOfRange`] if the floor does not exist.
    pub fn floor(&self, floor: u16) -> Result<FloorPanel, DispatchError> {
        self.floors
            .get(usize::from(floor))
            .copied()
            .ok_or(DispatchError::FloorOutOfRange {
                floor,
                floors: self.floor_count(),
            })
    }

    /// Presses the `direction` button on `floor`.
    pub fn press(&mut self, floor: u16, direction: CallDirection) -> Result<Assignment, DispatchError> {
        let panel = self.floor(floor)?;
        panel.press(self, direction)
    }

    pub fn car(&self, car_id: CarId) -> Result<&Car, DispatchError> {
        self.cars
            .get(car_id.index())
            .ok_or(DispatchError::UnknownCar(car_id))
    }

    /// Returns an iterator over all cars in registration order.
    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.cars.iter()
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn floor_count(&self) -> u16 {
        // Built from a u16 count, so the length always fits.
        self.floors.len() as u16
    }

    fn check_floor(&self, floor: u16) -> Result<(), DispatchError> {
        self.floor(floor).map(|_| ())
    }

    /// Removes queued calls at `floor` once some car stops there.
    fn drop_covered_calls(&mut self, floor: u16) {
        let dropped = self.queue.retain_unassigned(|request| request.floor() == floor);
        if dropped > 0 {
            debug!(floor, dropped, "queued calls covered by a car stop");
        }
    }
}

fn is_covered(cars: &[Car], floor: u16) -> bool {
    cars.iter().any(|car| car.destinations().contains(&floor))
}

/// Picks a car for `request` and adds the stop to it.
///
/// Free-standing so it can run while the queue is mutably borrowed.
fn assign(cars: &mut [Car], limit: Option<NonZeroUsize>, request: &Request) -> Option<CarId> {
    let index = select_car(cars, limit, request.floor())?;
    let car = &mut cars[index];
    car.add_destination(request.floor());
    info!(
        request = %request.id(),
        car = %car.id(),
        floor = request.floor(),
        direction = %car.direction(),
        "request assigned"
    );
    Some(car.id())
}

/// First idle car, else the least-loaded one. Cars at the stop limit are
/// skipped unless they already stop at `floor`.
fn select_car(cars: &[Car], limit: Option<NonZeroUsize>, floor: u16) -> Option<usize> {
    let has_room = |car: &Car| {
        limit.is_none_or(|limit| {
            car.pending_count() < limit.get() || car.destinations().contains(&floor)
        })
    };

    let eligible = cars.iter().enumerate().filter(|&(_, car)| has_room(car));
    if let Some((index, _)) = eligible.clone().find(|(_, car)| car.is_idle()) {
        return Some(index);
    }
    eligible
        .min_by_key(|(_, car)| car.pending_count())
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Direction;

    fn car_at(id: u16, floor: u16, stops: &[u16]) -> Car {
        let mut car = Car::new(CarId(id), floor);
        for &stop in stops {
            car.add_destination(stop);
        }
        car
    }

    #[test]
    fn select_prefers_first_idle_car() {
        let cars = vec![car_at(0, 0, &[4]), car_at(1, 3, &[]), car_at(2, 9, &[])];
        assert_eq!(select_car(&cars, None, 5), Some(1));
    }

    #[test]
    fn select_falls_back_to_least_loaded() {
        let cars = vec![car_at(0, 0, &[4, 6]), car_at(1, 3, &[8]), car_at(2, 9, &[1])];
        assert_eq!(select_car(&cars, None, 5), Some(1));
    }

    #[test]
    fn select_skips_full_cars() {
        let limit = NonZeroUsize::new(1);
        let cars = vec![car_at(0, 0, &[4]), car_at(1, 3, &[8])];
        assert_eq!(select_car(&cars, limit, 5), None);
    }

    #[test]
    fn full_car_still_takes_floor_it_already_stops_at() {
        let limit = NonZeroUsize::new(1);
        let cars = vec![car_at(0, 0, &[4]), car_at(1, 3, &[8])];
        assert_eq!(select_car(&cars, limit, 8), Some(1));
    }

    #[test]
    fn assign_orients_idle_car() {
        let mut cars = vec![car_at(0, 6, &[])];
        let request = Request::pickup(RequestId(0), 2, CallDirection::Up);
        assert_eq!(assign(&mut cars, None, &request), Some(CarId(0)));
        assert_eq!(cars[0].direction(), Direction::Down);
    }

    #[test]
    fn rejected_pickup_consumes_no_request_id() {
        let mut dispatcher = Dispatcher::new(1, 3).unwrap();
        assert!(dispatcher.request_pickup(3, CallDirection::Up).is_err());
        dispatcher.request_pickup(1, CallDirection::Up).unwrap();
        assert_eq!(dispatcher.requests.next_id(), RequestId(1));
    }

    #[test]
    fn destination_selection_consumes_no_request_id() {
        let mut dispatcher = Dispatcher::new(1, 6).unwrap();
        assert_eq!(dispatcher.select_destination(CarId(0), 4), Ok(true));
        assert_eq!(dispatcher.select_destination(CarId(0), 4), Ok(false));
        assert_eq!(dispatcher.requests.next_id(), RequestId(0));
    }
}
