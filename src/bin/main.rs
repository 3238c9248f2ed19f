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

use clap::{Parser, ValueEnum};
use csv::Writer;
use std::io::Write;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use teller_demo_rs::runner::{self, ScenarioSummary};
use teller_demo_rs::{RaceWindow, Reporter, StderrReporter};

/// Teller Demo - concurrent ledger strategies side by side
///
/// Runs the selected scenario(s), narrates each processing step to stderr,
/// and writes a CSV summary of final ledger states to stdout.
#[derive(Parser, Debug)]
#[command(name = "teller-demo-rs")]
#[command(about = "Drives a shared bank ledger through three concurrency strategies", long_about = None)]
struct Args {
    /// Which scenario to run
    #[arg(value_enum, default_value = "all")]
    scenario: Scenario,

    /// Simulated processing time held inside each executor's race window,
    /// in milliseconds
    #[arg(long, default_value_t = 50)]
    delay_ms: u64,

    /// Number of trials for the race scenario
    #[arg(long, default_value_t = 5)]
    trials: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scenario {
    All,
    Race,
    Serial,
    Locked,
}

fn main() {
    let args = Args::parse();

    let window = if args.delay_ms == 0 {
        RaceWindow::None
    } else {
        RaceWindow::Sleep(Duration::from_millis(args.delay_ms))
    };
    let reporter: Arc<dyn Reporter + Send + Sync> = Arc::new(StderrReporter);

    let mut summaries = Vec::new();
    match args.scenario {
        Scenario::All => {
            summaries.push(runner::race_scenario(
                args.trials,
                window.clone(),
                Arc::clone(&reporter),
            ));
            summaries.push(runner::serial_scenario(window.clone(), Arc::clone(&reporter)));
            summaries.push(runner::locked_scenario(window, reporter));
        }
        Scenario::Race => summaries.push(runner::race_scenario(args.trials, window, reporter)),
        Scenario::Serial => summaries.push(runner::serial_scenario(window, reporter)),
        Scenario::Locked => summaries.push(runner::locked_scenario(window, reporter)),
    }

    if let Err(e) = write_summaries(&summaries, std::io::stdout()) {
        eprintln!("Error writing summary: {}", e);
        process::exit(1);
    }
}

/// Write scenario summaries as CSV.
///
/// Columns: `scenario, initial_balance, final_balance, committed, rejected,
/// invariant_violations`.
fn write_summaries<W: Write>(summaries: &[ScenarioSummary], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for summary in summaries {
        wtr.serialize(summary)?;
    }
    wtr.flush()?;
    Ok(())
}
