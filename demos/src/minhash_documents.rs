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

//! Prints MinHash signatures of documents and compares them pairwise.

use std::path::PathBuf;

use clap::Parser;
use sketchlab::minhash::MinHashConfig;
use sketchlab::minhash::MinHashSignature;
use sketchlab::minhash::Stopwords;
use sketchlab::minhash::jaccard_estimate;
use sketchlab::minhash::similarity;

#[derive(Debug, Parser)]
#[command(about = "MinHash signatures of text documents")]
struct Args {
    /// Text documents to compare.
    #[arg(required = true)]
    documents: Vec<PathBuf>,
    /// Words per shingle (n).
    #[arg(long, default_value_t = 2)]
    width: usize,
    /// Hash values kept per signature (k).
    #[arg(long, default_value_t = 10)]
    size: usize,
    /// Comma-separated stopwords; the classroom list when omitted.
    #[arg(long, value_delimiter = ',')]
    stopwords: Option<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    demos::init_logging();
    let args = Args::parse();

    let stopwords: Stopwords = match args.stopwords {
        Some(words) => words.into_iter().collect(),
        None => Stopwords::classroom(),
    };
    let config = MinHashConfig::new(args.width, args.size)?.stopwords(stopwords);

    println!("=== MinHash Signatures (n = {}, k = {}) ===\n", args.width, args.size);
    let mut signatures = Vec::new();
    for path in &args.documents {
        match MinHashSignature::from_path(path, &config) {
            Ok(signature) => {
                println!("{}:", path.display());
                println!("   Shingles read: {}", signature.num_shingles());
                println!("   Signature: {:?}", signature.values().collect::<Vec<_>>());
                signatures.push((path, signature));
            }
            Err(err) => tracing::warn!(path = %path.display(), "skipping document: {err}"),
        }
    }
    println!();

    println!("Pairwise comparison (slot-wise / estimated Jaccard):");
    for (i, (path_a, a)) in signatures.iter().enumerate() {
        for (path_b, b) in &signatures[i + 1..] {
            println!(
                "   {} vs {}: {:.2} / {:.2}",
                path_a.display(),
                path_b.display(),
                similarity(a, b)?,
                jaccard_estimate(a, b)?
            );
        }
    }

    Ok(())
}
