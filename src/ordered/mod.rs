//! Ordered map backed by a binary search tree with parent links.
//!
//! - [`OrderedMap`]: the map itself
//! - [`NodeHandle`]: a stable reference to one of its nodes
//! - [`KeyNotFound`]: the error returned when deleting an absent key
//!
//! # Storage
//!
//! Nodes are kept in an arena and refer to their children and parent by
//! handle. The parent link makes deletion and neighbour navigation O(1) per
//! step without an ownership cycle.
//!
//! # Examples
//!
//! ```rust
//! use bst_map::ordered::{KeyNotFound, OrderedMap};
//!
//! let mut map: OrderedMap<i32, i32> = [5, 3, 8, 1, 4, 7, 9]
//!     .into_iter()
//!     .map(|key| (key, key * 10))
//!     .collect();
//!
//! let root = map.root_handle().unwrap();
//! assert_eq!(map.delete(&5), Ok(50));
//!
//! // The in-order successor took over the deleted node's position.
//! assert_eq!(map.entry_at(root), Some((&7, &70)));
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &3, &4, &7, &8, &9]);
//!
//! assert_eq!(map.delete(&5), Err(KeyNotFound));
//! ```

mod arena;
mod error;
mod iter;
mod map;

pub use arena::NodeHandle;
pub use error::InvariantViolation;
pub use error::KeyNotFound;
pub use iter::IntoIter;
pub use iter::Iter;
pub use iter::PostOrder;
pub use iter::PreOrder;
pub use map::OrderedMap;
