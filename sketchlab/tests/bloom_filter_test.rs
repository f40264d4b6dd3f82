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

mod common;

use std::collections::HashSet;
use std::fs;

use common::test_data;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::near;
use sketchlab::bloom::BloomFilterBuilder;
use sketchlab::bloom::Membership;

const MALICIOUS: [&str; 5] = [
    "virus.net",
    "malware.com",
    "worm.edu",
    "phising.org",
    "cookiemonster.gov",
];

#[test]
fn test_classroom_filter() {
    let mut filter = BloomFilterBuilder::with_size(50, 2).unwrap().build();
    assert_eq!(filter.bits_used(), 0);

    for site in MALICIOUS {
        filter.insert(site);
    }
    assert!(filter.bits_used() <= 10);
    assert_eq!(filter.query("phising.org"), Membership::Possible);

    // The answer for an unrelated site is not fixed, but it is repeatable.
    let mut again = BloomFilterBuilder::with_size(50, 2).unwrap().build();
    for site in MALICIOUS {
        again.insert(site);
    }
    assert_eq!(filter, again);
    assert_eq!(filter.query("cats.com"), again.query("cats.com"));
}

#[test]
fn test_sites_from_file() {
    let contents = fs::read_to_string(test_data("websites.txt")).unwrap();
    let sites: Vec<&str> = contents.lines().map(str::trim).collect();
    assert_eq!(sites, MALICIOUS);

    let mut filter = BloomFilterBuilder::with_accuracy(sites.len() as u64, 0.15)
        .unwrap()
        .build();
    for site in &sites {
        filter.insert(site);
    }
    assert_eq!(filter.count_possible(&sites), sites.len());
}

#[test]
fn test_no_false_negatives() {
    let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.05)
        .unwrap()
        .build();
    let items: Vec<String> = (0..1000).map(|i| format!("site-{i}.example")).collect();
    for item in &items {
        filter.insert(item);
    }
    for item in &items {
        assert_eq!(filter.query(item), Membership::Possible, "{item}");
    }
}

#[test]
fn test_possible_count_is_monotone() {
    let mut filter = BloomFilterBuilder::with_size(512, 3).unwrap().build();
    let queries: Vec<String> = (0..2000).map(|i| format!("query-{i}.test")).collect();

    let mut previous = filter.count_possible(&queries);
    assert_eq!(previous, 0);
    for i in 0..300 {
        filter.insert(format!("inserted-{i}.test"));
        let current = filter.count_possible(&queries);
        assert_that!(current, ge(previous));
        previous = current;
    }
}

#[test]
fn test_false_positive_rate_converges() {
    let n = 1300;
    let mut filter = BloomFilterBuilder::with_accuracy(n, 0.15).unwrap().build();
    let inserted: HashSet<String> = (0..n).map(|i| format!("malicious-{i}.net")).collect();
    for site in &inserted {
        filter.insert(site);
    }

    let num_queries = 100_000;
    let false_positives = (0..num_queries)
        .map(|i| format!("benign-{i}.org"))
        .filter(|site| !inserted.contains(site) && filter.contains(site))
        .count();
    let rate = false_positives as f64 / num_queries as f64;

    assert_that!(rate, near(0.15, 0.02));
    assert_that!(filter.theoretical_fpp(n), near(0.15, 0.005));
    assert_that!(filter.estimated_fpp(), near(rate, 0.02));
}

#[test]
fn test_load_factor_after_fill() {
    let n = 1300;
    let mut filter = BloomFilterBuilder::with_accuracy(n, 0.15).unwrap().build();
    for i in 0..n {
        filter.insert(i);
    }
    // Expected fraction of set bits is 1 - e^(-kn/m), about 0.53 here.
    assert_that!(filter.load_factor(), near(0.532, 0.03));
}
