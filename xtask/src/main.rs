// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::process::Command as StdCommand;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "x", about = "Workspace tasks for sketchlab")]
struct Command {
    #[command(subcommand)]
    sub: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    /// Run unit, integration and doc tests.
    Test {
        /// Pass --no-capture to the test harness.
        #[arg(long)]
        no_capture: bool,
    },
    /// Run clippy over every target with warnings denied.
    Lint,
    /// Format the workspace, or check formatting with --check.
    Fmt {
        #[arg(long)]
        check: bool,
    },
}

impl SubCommand {
    fn cargo_args(&self) -> Vec<&'static str> {
        match self {
            SubCommand::Test { no_capture } => {
                let mut args = vec!["test", "--workspace"];
                if *no_capture {
                    args.extend(["--", "--no-capture"]);
                }
                args
            }
            SubCommand::Lint => vec![
                "clippy",
                "--workspace",
                "--all-targets",
                "--all-features",
                "--",
                "-D",
                "warnings",
            ],
            SubCommand::Fmt { check } => {
                let mut args = vec!["fmt", "--all"];
                if *check {
                    args.extend(["--", "--check"]);
                }
                args
            }
        }
    }
}

fn main() -> ExitCode {
    let cmd = Command::parse();

    let cargo = match which::which("cargo") {
        Ok(cargo) => cargo,
        Err(err) => {
            eprintln!("cannot find cargo: {err}");
            return ExitCode::FAILURE;
        }
    };

    let args = cmd.sub.cargo_args();
    eprintln!("running: cargo {}", args.join(" "));
    match StdCommand::new(cargo).args(&args).status() {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        Ok(status) => {
            eprintln!("cargo exited with {status}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("failed to run cargo: {err}");
            ExitCode::FAILURE
        }
    }
}
