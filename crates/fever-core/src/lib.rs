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


//! # Fever Core
//!
//! Generational handle allocation for objects owned behind an API boundary.
//!
//! - [`Handle`] packs a slot index and a generation into a `u32`.
//! - [`HandleDataStore`] owns a dense, recycled array of values and validates
//!   handles against per-slot generations.
//! - [`PersistentHandleDataStore`] wraps a [`HandleDataStore`] in a
//!   fixed-capacity registry so that each issued handle sits at a stable
//!   address for the lifetime of its entry.
//!
//! Invalid or stale handles never panic: queries report them as `false` or
//! `None`. The stores are single-threaded; wrap one in a lock to share it.

#![warn(missing_docs)]

pub mod handle;
pub mod persistent;
pub mod store;

pub use handle::Handle;
pub use persistent::PersistentHandleDataStore;
pub use store::HandleDataStore;
