// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod config;
mod event;
mod queue;
mod registry;
mod router;
mod state;

pub use config::{Config, PathError, DEFAULT_EPSILON, DEFAULT_MAX_ITERATION, DEFAULT_STEP_ITERATION};
pub use event::{Event, Route};
pub use router::{find_route, Router, Status};
