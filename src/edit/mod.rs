pub mod change;
pub mod link;
pub mod node_ops;
pub mod ops;
pub mod refactor;

pub use change::*;
pub use link::*;
pub use node_ops::*;
pub use refactor::*;
