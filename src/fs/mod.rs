//! Web root access
//!
//! Path classification and directory indexes. Nothing here is cached; every
//! request looks at the live filesystem.

pub mod index;
pub mod resolver;

pub use index::{DirectoryIndex, DirectoryLister, ListingBase, TreeLister};
pub use resolver::{Resource, ResourceKind, ResourceResolver};
