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

//! Tabulates binomial probabilities next to their normal approximation.

use clap::Parser;
use sketchlab::approx::NormalApproximation;

#[derive(Debug, Parser)]
#[command(about = "Normal approximation to the binomial distribution")]
struct Args {
    /// Numbers of trials to compare.
    #[arg(long, value_delimiter = ',', default_value = "10,50,100")]
    trials: Vec<u64>,
    /// Success probability per trial.
    #[arg(long, default_value_t = 0.1)]
    p: f64,
}

fn main() -> anyhow::Result<()> {
    demos::init_logging();
    let args = Args::parse();

    for n in args.trials {
        let approx = NormalApproximation::new(n, args.p, 1)?;
        println!(
            "=== n = {n}, p = {} (mean {:.2}, variance {:.2}) ===",
            args.p,
            approx.mean(),
            approx.variance()
        );
        println!("   {:>5}  {:>10}  {:>10}", "k", "PMF", "PDF");

        // Skip the far tail, where both columns print as zero.
        let cutoff = approx.mean() + 5.0 * approx.normal().std_dev();
        for (k, &mass) in approx.pmf().iter().enumerate() {
            if k as f64 > cutoff {
                break;
            }
            println!(
                "   {k:>5}  {mass:>10.6}  {:>10.6}",
                approx.normal().pdf(k as f64)
            );
        }
        println!("   Max |PMF - PDF|: {:.6}\n", approx.max_abs_error());
    }

    Ok(())
}
