// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side repository functions.
//!
//! Each entity module applies the parts of `SelectOptions` it supports:
//! paging and ordering everywhere, search over its own columns, and a
//! status predicate only where the entity has one (permits and visitors).

pub mod admins;
pub mod cars;
pub mod permits;
pub mod residents;
pub mod visitors;

use diesel::sql_types::Text;

diesel::define_sql_function! {
    /// SQL `LOWER`, available on both backends.
    fn lower(x: Text) -> Text;
}
