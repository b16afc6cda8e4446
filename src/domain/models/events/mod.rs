pub mod member_join;

pub use member_join::*;
