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

//! The string-to-integer hash primitive shared by the Bloom filter and MinHash.
//!
//! Both structures feed items through [`std::hash::Hash`] into a streaming
//! MurmurHash3 x64/128 hasher. The Bloom filter uses both 64-bit halves for
//! double hashing; MinHash keeps a 63-bit value so that `u64::MAX` can mark an
//! empty signature slot.

mod murmurhash;

pub use self::murmurhash::hash128;
pub use self::murmurhash::hash63;

/// Seed used when the caller does not pick one.
pub const DEFAULT_UPDATE_SEED: u32 = 9001;
