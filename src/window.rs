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

//! Injectable processing pause.
//!
//! Every executor pauses between its balance check and its commit, which
//! models the real duration of processing a transaction. The demo binary
//! uses [`RaceWindow::Sleep`] to make the unsynchronized teller's race
//! window wide enough to hit; tests that need a deterministic interleaving
//! use [`RaceWindow::Rendezvous`] so that every racing request reaches the
//! commit only after all of them have passed the check. The rendezvous
//! shapes scheduling without adding any synchronization to the commit
//! itself.

use std::sync::Arc;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

/// Where the processing time goes.
#[derive(Debug, Clone, Default)]
pub enum RaceWindow {
    /// No pause. Used by tests and benchmarks that only care about outcomes.
    #[default]
    None,
    /// Wall-clock sleep, widening the race window for demonstration.
    Sleep(Duration),
    /// Block until all participants have reached the window.
    ///
    /// The barrier size must equal the number of racing requests, or the
    /// participants will wait forever.
    Rendezvous(Arc<Barrier>),
}

impl RaceWindow {
    pub fn pause(&self) {
        match self {
            RaceWindow::None => {}
            RaceWindow::Sleep(duration) => thread::sleep(*duration),
            RaceWindow::Rendezvous(barrier) => {
                barrier.wait();
            }
        }
    }
}
