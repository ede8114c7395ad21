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

//! Property-based tests for the dispatcher.
//!
//! These tests verify invariants that should hold for any sequence of
//! pickups, in-car selections, and ticks.

use elevator_demo_rs::{
    CallDirection, Car, CarId, Direction, Dispatcher, DispatcherConfig, DoorState,
};
use proptest::prelude::*;
use std::num::NonZeroUsize;

const FLOORS: u16 = 12;
const CARS: u16 = 3;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Pickup(u16, CallDirection),
    Select(u16, u16),
    Step,
}

fn arb_direction() -> impl Strategy<Value = CallDirection> {
    prop_oneof![Just(CallDirection::Up), Just(CallDirection::Down)]
}

/// Operations with floors and car ids mostly in range, sometimes not.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..FLOORS + 2, arb_direction()).prop_map(|(floor, dir)| Op::Pickup(floor, dir)),
        2 => (0..CARS + 1, 0..FLOORS + 2).prop_map(|(car, floor)| Op::Select(car, floor)),
        5 => Just(Op::Step),
    ]
}

fn arb_config() -> impl Strategy<Value = DispatcherConfig> {
    (1..=CARS, 0..FLOORS, prop::option::of(1usize..4)).prop_map(|(cars, start, limit)| {
        let mut config = DispatcherConfig::new(cars, FLOORS).with_start_floor(start);
        if let Some(limit) = limit.and_then(NonZeroUsize::new) {
            config = config.with_max_stops_per_car(limit);
        }
        config
    })
}

fn apply(dispatcher: &mut Dispatcher, op: &Op) {
    match *op {
        Op::Pickup(floor, direction) => {
            let _ = dispatcher.request_pickup(floor, direction);
        }
        Op::Select(car, floor) => {
            let _ = dispatcher.select_destination(CarId(car), floor);
        }
        Op::Step => {
            dispatcher.step();
        }
    }
}

fn floors_of(dispatcher: &Dispatcher) -> Vec<u16> {
    dispatcher.cars().map(Car::current_floor).collect()
}

// =============================================================================
// Dispatcher Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// No car moves more than one floor per tick.
    #[test]
    fn cars_move_at_most_one_floor_per_tick(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..80),
    ) {
        let mut dispatcher = Dispatcher::with_config(&config).unwrap();
        for op in &ops {
            let before = floors_of(&dispatcher);
            apply(&mut dispatcher, op);
            let after = floors_of(&dispatcher);
            for (b, a) in before.iter().zip(&after) {
                prop_assert!(b.abs_diff(*a) <= 1, "moved from {} to {}", b, a);
            }
            if !matches!(op, Op::Step) {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// After every tick a car has a direction exactly when it has stops.
    #[test]
    fn direction_none_iff_no_stops_after_step(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..80),
    ) {
        let mut dispatcher = Dispatcher::with_config(&config).unwrap();
        for op in &ops {
            apply(&mut dispatcher, op);
            for car in dispatcher.cars() {
                if matches!(op, Op::Step) {
                    prop_assert_eq!(
                        car.direction() == Direction::None,
                        car.destinations().is_empty()
                    );
                }
                // Between ticks a directionless car only waits at its own floor.
                if car.direction() == Direction::None {
                    prop_assert!(car.destinations().iter().all(|&f| f == car.current_floor()));
                }
                prop_assert_eq!(car.door_state(), DoorState::Closed);
            }
        }
    }

    /// Cars never hold or reach floors outside the building.
    #[test]
    fn cars_stay_inside_building(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..80),
    ) {
        let mut dispatcher = Dispatcher::with_config(&config).unwrap();
        for op in &ops {
            apply(&mut dispatcher, op);
        }
        for car in dispatcher.cars() {
            prop_assert!(car.current_floor() < FLOORS);
            prop_assert!(car.destinations().iter().all(|&f| f < FLOORS));
        }
    }

    /// A queued call never waits at a floor some car already stops at.
    #[test]
    fn queued_calls_are_not_covered_by_any_car(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..80),
    ) {
        let mut dispatcher = Dispatcher::with_config(&config).unwrap();
        for op in &ops {
            apply(&mut dispatcher, op);
            for request in dispatcher.queue().iter() {
                let floor = request.floor();
                prop_assert!(
                    dispatcher.cars().all(|car| !car.destinations().contains(&floor)),
                    "queued call at floor {} already covered after {:?}",
                    floor,
                    op
                );
            }
        }
    }

    /// Without a stop limit nothing is ever queued.
    #[test]
    fn unlimited_fleet_never_queues(
        ops in prop::collection::vec(arb_op(), 1..80),
    ) {
        let mut dispatcher = Dispatcher::new(CARS, FLOORS).unwrap();
        for op in &ops {
            apply(&mut dispatcher, op);
            prop_assert_eq!(dispatcher.status().queued, 0);
        }
    }

    /// Every accepted request is eventually served.
    #[test]
    fn all_requests_served_within_bound(
        config in arb_config(),
        ops in prop::collection::vec(arb_op(), 1..60),
    ) {
        let mut dispatcher = Dispatcher::with_config(&config).unwrap();
        for op in &ops {
            apply(&mut dispatcher, op);
        }

        // A car reaches its next stop within one building length, and each
        // stop it serves frees room for a queued call.
        let queued = dispatcher.status().queued as u64;
        let bound = (queued + 2) * 4 * u64::from(FLOORS);
        let ran = dispatcher.run_until_idle(bound);

        prop_assert!(dispatcher.is_idle(), "not idle after {} ticks", ran);
    }
}

// =============================================================================
// Car Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Adding a stop twice leaves the same stops and direction as once.
    #[test]
    fn add_destination_idempotent(
        start in 0..FLOORS,
        stops in prop::collection::vec(0..FLOORS, 0..6),
        floor in 0..FLOORS,
    ) {
        let mut once = Car::new(CarId(0), start);
        let mut twice = Car::new(CarId(0), start);
        for &stop in &stops {
            once.add_destination(stop);
            twice.add_destination(stop);
        }
        once.add_destination(floor);
        twice.add_destination(floor);
        twice.add_destination(floor);

        prop_assert_eq!(once.destinations(), twice.destinations());
        prop_assert_eq!(once.direction(), twice.direction());
    }

    /// A single stop `d` floors away is served on tick `max(d, 1)`.
    #[test]
    fn single_stop_served_after_distance_ticks(
        start in 0..FLOORS,
        target in 0..FLOORS,
    ) {
        let mut car = Car::new(CarId(0), start);
        car.add_destination(target);

        let expected = u32::from(start.abs_diff(target)).max(1);
        let mut ticks = 0;
        while !car.is_idle() {
            car.step();
            ticks += 1;
            prop_assert!(ticks <= expected);
        }
        prop_assert_eq!(ticks, expected);
        prop_assert_eq!(car.current_floor(), target);
        prop_assert_eq!(car.door().openings(), 1);
    }
}
