// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side repository functions.
//!
//! Used-days counters are only ever changed with `col = col + delta` in a
//! single statement; nothing here reads a counter and writes it back.

pub mod admins;
pub mod cars;
pub mod locks;
pub mod permits;
pub mod residents;
pub mod visitors;
