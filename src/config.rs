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

//! Fleet and building configuration.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! cars = 3
//! floors = 12
//! start_floor = 0
//! max_stops_per_car = 4
//! ```
//!
//! Every key is optional and falls back to [`DispatcherConfig::default`].

use crate::error::DispatchError;
use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] DispatchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Number of cars in the fleet.
    pub cars: u16,
    /// Number of floors, numbered `0..floors`.
    pub floors: u16,
    /// Floor every car starts on.
    pub start_floor: u16,
    /// Pending stops a car may hold before pickups skip it. Unlimited when
    /// unset, in which case pickups are never queued.
    pub max_stops_per_car: Option<NonZeroUsize>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cars: 2,
            floors: 10,
            start_floor: 0,
            max_stops_per_car: None,
        }
    }
}

impl DispatcherConfig {
    pub fn new(cars: u16, floors: u16) -> Self {
        Self {
            cars,
            floors,
            ..Self::default()
        }
    }

    pub fn with_start_floor(mut self, floor: u16) -> Self {
        self.start_floor = floor;
        self
    }

    pub fn with_max_stops_per_car(mut self, limit: NonZeroUsize) -> Self {
        self.max_stops_per_car = Some(limit);
        self
    }

    /// Checks that the fleet and building are non-empty and the start floor
    /// exists.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.cars == 0 {
            return Err(DispatchError::EmptyFleet);
        }
        if self.floors == 0 {
            return Err(DispatchError::NoFloors);
        }
        if self.start_floor >= self.floors {
            return Err(DispatchError::StartFloorOutOfRange {
                floor: self.start_floor,
                floors: self.floors,
            });
        }
        Ok(())
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
