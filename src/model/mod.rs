pub mod node;
pub mod tree;
pub mod expansion;
pub mod config;

pub use node::*;
pub use tree::*;
pub use expansion::*;
pub use config::*;
