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

use std::hash::Hash;

use mur3::Hasher128;

/// Hashes an item with MurmurHash3 x64/128 and returns both 64-bit halves.
pub fn hash128<T: Hash + ?Sized>(item: &T, seed: u32) -> (u64, u64) {
    let mut hasher = Hasher128::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish128()
}

/// Hashes an item to a value in `[0, 2^63)`.
///
/// The top bit is dropped, so the result never equals `u64::MAX`.
pub fn hash63<T: Hash + ?Sized>(item: &T, seed: u32) -> u64 {
    let (h1, _) = hash128(item, seed);
    h1 >> 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::DEFAULT_UPDATE_SEED;

    #[test]
    fn test_known_vectors() {
        // A `str` feeds its bytes followed by a 0xff terminator.
        assert_eq!(
            hash128("virus.net", DEFAULT_UPDATE_SEED),
            (0x7a66eceb285f5587, 0x9f60ee7ca267aa80)
        );
        assert_eq!(hash63("virus.net", DEFAULT_UPDATE_SEED), 0x3d337675942faac3);
        assert_eq!(hash63("jack jill", DEFAULT_UPDATE_SEED), 0x02acaed2401ade42);

        let one_shot = mur3::murmurhash3_x64_128(b"virus.net\xff", DEFAULT_UPDATE_SEED);
        assert_eq!(hash128("virus.net", DEFAULT_UPDATE_SEED), one_shot);
    }

    #[test]
    fn test_borrowed_and_owned_hash_alike() {
        let owned = String::from("virus.net");
        assert_eq!(
            hash128(&owned, DEFAULT_UPDATE_SEED),
            hash128("virus.net", DEFAULT_UPDATE_SEED)
        );
        assert_eq!(
            hash128(&"virus.net", DEFAULT_UPDATE_SEED),
            hash128("virus.net", DEFAULT_UPDATE_SEED)
        );
    }

    #[test]
    fn test_deterministic_per_seed() {
        assert_eq!(hash128("virus.net", 9001), hash128("virus.net", 9001));
        assert_ne!(hash128("virus.net", 9001), hash128("virus.net", 9002));
        assert_ne!(hash128("virus.net", 9001), hash128("malware.com", 9001));
    }

    #[test]
    fn test_hash63_top_bit_clear() {
        for i in 0..1000 {
            let h = hash63(&format!("shingle {i}"), 9001);
            assert!(h < 1 << 63);
        }
    }
}
