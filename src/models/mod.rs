pub mod debris;

pub use debris::*;
