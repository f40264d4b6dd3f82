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

//! Builds a Bloom filter over a list of malicious websites and compares its
//! query speed and accuracy with an exact search of the list.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use sketchlab::bloom::BloomFilterBuilder;

#[derive(Debug, Parser)]
#[command(about = "Bloom filter over a website list")]
struct Args {
    /// Sites to insert, one per line; only the first comma-separated field is used.
    #[arg(long)]
    sites: Option<PathBuf>,
    /// Sites to query, one per line. Generated when omitted.
    #[arg(long)]
    queries: Option<PathBuf>,
    /// Target false positive probability.
    #[arg(long, default_value_t = 0.15)]
    fpp: f64,
    /// Number of sites to generate when no site list is given.
    #[arg(long, default_value_t = 1300)]
    generate: usize,
}

fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(contents
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|site| !site.is_empty())
        .map(String::from)
        .collect())
}

fn main() -> anyhow::Result<()> {
    demos::init_logging();
    let args = Args::parse();

    let sites = match &args.sites {
        Some(path) => read_lines(path)?,
        None => (0..args.generate)
            .map(|i| format!("malicious-{i}.net"))
            .collect(),
    };
    anyhow::ensure!(!sites.is_empty(), "no sites to insert");

    println!("=== Bloom Filter ===\n");
    let n = sites.len() as u64;
    let mut filter = BloomFilterBuilder::with_accuracy(n, args.fpp)?.build();
    for site in &sites {
        filter.insert(site);
    }

    println!("1. Sizing for n = {n}, p = {}:", args.fpp);
    println!("   Bits (m): {}", filter.capacity());
    println!("   Hash functions (k): {}", filter.num_hashes());
    println!(
        "   Theoretical FPP: {:.4} (exact {:.4})",
        filter.theoretical_fpp(n),
        filter.theoretical_fpp_exact(n)
    );
    println!(
        "   Bits set: {} ({:.2}% full)",
        filter.bits_used(),
        filter.load_factor() * 100.0
    );
    println!();

    let queries = match &args.queries {
        Some(path) => read_lines(path)?,
        None => (0..20_000)
            .map(|i| {
                if i % 4 == 0 {
                    sites[(i / 4) % sites.len()].clone()
                } else {
                    format!("benign-{i}.org")
                }
            })
            .collect(),
    };

    println!("2. Querying {} sites:", queries.len());
    let start = Instant::now();
    let possible = filter.count_possible(&queries);
    let bloom_elapsed = start.elapsed();

    let start = Instant::now();
    let actual = queries
        .iter()
        .filter(|query| sites.contains(query))
        .count();
    let exact_elapsed = start.elapsed();

    println!("   Bloom filter: {possible} possible in {bloom_elapsed:?}");
    println!("   Exact search: {actual} malicious in {exact_elapsed:?}");
    println!();

    let negatives = queries.len() - actual;
    let false_positives = possible - actual;
    println!("3. Accuracy:");
    println!("   False positives: {false_positives} of {negatives} negatives");
    if negatives > 0 {
        println!(
            "   Observed FPP: {:.4} (theoretical {:.4})",
            false_positives as f64 / negatives as f64,
            filter.theoretical_fpp(n)
        );
    }

    Ok(())
}
