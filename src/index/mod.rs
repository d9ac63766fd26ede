pub mod btree_index;
pub mod btree_meta;
pub mod btree_node;

pub use btree_index::{BTreeIndex, ScanOp};
pub use btree_meta::{AttrType, MetaPage, MetaPageRef, RELATION_NAME_LEN};
pub use btree_node::{
    is_leaf_page, InternalNode, InternalNodeRef, LeafNode, LeafNodeRef, INTERNAL_CAPACITY,
    LEAF_CAPACITY,
};
