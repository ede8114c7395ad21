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

//! # Elevator Demo
//!
//! This library provides a tick-driven elevator simulation: a dispatcher that
//! assigns hall calls to a fixed fleet of cars, queues calls no car can take,
//! and advances every car one floor per tick.
//!
//! ## Core Components
//!
//! - [`Dispatcher`]: Owns the fleet and floors, assigns requests, runs ticks
//! - [`Car`]: Single car with its pending stops, direction, and [`Door`]
//! - [`FloorPanel`]: Up/down call buttons on a floor
//! - [`RequestQueue`]: FIFO of requests waiting for a car
//! - [`SystemStatus`]: Read-only snapshot of every car and the queue
//! - [`DispatchError`]: Error types for rejected requests and configurations
//!
//! ## Example
//!
//! ```
//! use elevator_demo_rs::{Assignment, CallDirection, CarId, Dispatcher};
//!
//! let mut dispatcher = Dispatcher::new(2, 10).unwrap();
//!
//! // Someone on floor 5 wants to go down
//! let assignment = dispatcher.request_pickup(5, CallDirection::Down).unwrap();
//! assert_eq!(assignment, Assignment::Assigned(CarId(0)));
//!
//! // Car 0 climbs one floor per tick
//! for _ in 0..5 {
//!     dispatcher.step();
//! }
//! let status = dispatcher.status();
//! assert_eq!(status.cars[0].current_floor, 5);
//! assert!(status.cars[0].pending.is_empty());
//! ```
//!
//! ## Threading
//!
//! A dispatcher is single-threaded and only changes inside its own methods.
//! Independent dispatchers can run on separate threads.

pub mod car;
pub mod config;
pub mod dispatcher;
pub mod door;
pub mod error;
mod base;
mod floor;
mod request;
mod request_queue;
mod status;

pub use base::{CarId, RequestId};
pub use car::{Car, CarEvent};
pub use config::{ConfigError, DispatcherConfig};
pub use dispatcher::{Assignment, Dispatcher, TickReport};
pub use door::{Door, DoorState};
pub use error::DispatchError;
pub use floor::FloorPanel;
pub use request::{CallDirection, Direction, Request};
pub use request_queue::RequestQueue;
pub use status::{CarStatus, SystemStatus};
