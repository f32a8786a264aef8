//! # bst-map
//!
//! An ordered map implemented as an unbalanced binary search tree whose
//! nodes carry a link to their parent.
//!
//! ## Overview
//!
//! - **Ordered map**: insert, lookup, delete and ascending iteration over
//!   keys with a total order
//! - **Arena storage**: nodes live in one table and reference each other by
//!   [`NodeHandle`](ordered::NodeHandle), so parent links form no ownership
//!   cycle
//! - **Stable handles**: deleting a node with two children keeps its handle,
//!   which then holds the promoted successor
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`OrderedMap`](ordered::OrderedMap)
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use bst_map::prelude::*;
//!
//! let mut map = OrderedMap::new();
//! map.insert(3, "red");
//! map.insert(4, "blue");
//! map.insert(6, "yellow");
//! map.insert(2, "at");
//!
//! assert_eq!(map.get(&2), Some(&"at"));
//! assert_eq!(map.delete(&3), Ok("red"));
//! assert_eq!(map.delete(&3), Err(KeyNotFound));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use bst_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ordered::*;
}

pub mod ordered;
