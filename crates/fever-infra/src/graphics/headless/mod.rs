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


//! An in-memory [`GraphicsBackend`](fever_device::GraphicsBackend) that never
//! touches a GPU.
//!
//! It builds plain Rust objects recording what was asked of it, accounts for
//! the memory a real device would have allocated, and counts everything it
//! executes. Useful for tests, tools and servers that drive the resource API
//! without a window.

mod backend;
mod objects;
mod stats;

pub use self::backend::HeadlessBackend;
pub use self::objects::*;
pub use self::stats::{HeadlessStats, KindCounters};
