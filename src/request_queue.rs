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

//! FIFO queue of requests waiting for a car, with deduplication.
//!
//! A floor/direction pair is held at most once. Pressing the same hall
//! button twice while the first call is still waiting adds nothing.

use crate::DispatchError;
use crate::request::{Direction, Request};
use std::collections::{HashSet, VecDeque};

/// A request queue with duplicate detection.
///
/// Combines a [`HashSet`] of queued calls for O(1) duplicate checking with a
/// [`VecDeque`] preserving arrival order.
#[derive(Debug, Default)]
pub struct RequestQueue {
    /// Floor/direction pairs currently queued.
    calls: HashSet<(u16, Direction)>,

    /// Requests in arrival order.
    requests: VecDeque<Request>,
}

impl RequestQueue {
    /// Creates a new empty request queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request to the back of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DuplicateRequest`] if a request for the same
    /// floor and direction is already queued.
    pub fn push(&mut self, request: Request) -> Result<(), DispatchError> {
        if !self.calls.insert(request.call()) {
            return Err(DispatchError::DuplicateRequest);
        }
        self.requests.push_back(request);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn contains(&self, floor: u16, direction: Direction) -> bool {
        self.calls.contains(&(floor, direction))
    }

    /// Iterates queued requests front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }

    /// Offers each request, front to back, to `assign`, dropping those for
    /// which it returns `true`. Order of the remaining requests is kept.
    ///
    /// Returns the number of requests removed.
    pub fn retain_unassigned<F>(&mut self, mut assign: F) -> usize
    where
        F: FnMut(&Request) -> bool,
    {
        let before = self.requests.len();
        let calls = &mut self.calls;
        self.requests.retain(|request| {
            if assign(request) {
                calls.remove(&request.call());
                false
            } else {
                true
            }
        });
        before - self.requests.len()
    }
}
