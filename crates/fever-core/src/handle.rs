// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the packed identifier handed out by the handle stores.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A weak, copyable reference to an object owned by a handle store.
///
/// It packs a slot index and a generation count into a single `u32` to solve
/// the "ABA problem". When an object is removed, its slot can be recycled for
/// a new object, but the slot's generation is incremented. Old handles still
/// carry the previous generation, so the store can tell they are stale and
/// will refuse to resolve them.
///
/// Layout: the low [`Handle::INDEX_BITS`] bits hold the index, the high
/// [`Handle::GENERATION_BITS`] bits hold the generation.
///
/// A `Handle` owns nothing. Whether it is valid is a property of the store
/// that issued it, not of the bit pattern.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle {
    id: u32,
}

impl Handle {
    /// Number of bits making up the index.
    pub const INDEX_BITS: u32 = 24;
    /// Number of bits making up the generation.
    pub const GENERATION_BITS: u32 = 8;
    /// Mask selecting the index bits of the packed id.
    pub const INDEX_MASK: u32 = (1 << Self::INDEX_BITS) - 1;
    /// Mask selecting the generation bits of the packed id.
    pub const GENERATION_MASK: u32 = !Self::INDEX_MASK;
    /// Largest index a handle can address.
    pub const MAX_INDEX: u32 = Self::INDEX_MASK;
    /// Largest generation a handle can carry before wrapping.
    pub const MAX_GENERATION: u32 = (1 << Self::GENERATION_BITS) - 1;

    /// Packs an index and a generation into a handle.
    ///
    /// Only the stores build handles this way. An index outside the bit budget
    /// means a store outgrew its addressable range, which is a bug in the
    /// caller's capacity planning rather than a runtime condition.
    pub(crate) fn pack(index: u32, generation: u8) -> Self {
        assert!(
            index <= Self::MAX_INDEX,
            "Tried to create a Handle with too high an index ({index} > {}).",
            Self::MAX_INDEX
        );
        Self {
            id: (u32::from(generation) << Self::INDEX_BITS) | index,
        }
    }

    /// Reinterprets a raw packed id as a handle.
    ///
    /// No validation happens here; ask the issuing store with `is_valid`.
    pub const fn from_raw(id: u32) -> Self {
        Self { id }
    }

    /// Returns the raw packed id.
    pub const fn to_raw(self) -> u32 {
        self.id
    }

    /// Returns the index part of the handle.
    pub const fn index(self) -> u32 {
        self.id & Self::INDEX_MASK
    }

    /// Returns the generation part of the handle.
    pub const fn generation(self) -> u32 {
        (self.id & Self::GENERATION_MASK) >> Self::INDEX_BITS
    }
}

// The stores keep generations in a `u8`.
const _: () = assert!(Handle::GENERATION_BITS == u8::BITS);
const _: () = assert!(Handle::INDEX_BITS + Handle::GENERATION_BITS == u32::BITS);

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index())
            .field("generation", &self.generation())
            .finish()
    }
}

impl From<Handle> for u32 {
    fn from(handle: Handle) -> Self {
        handle.to_raw()
    }
}
