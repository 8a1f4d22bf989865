pub mod api;
pub mod cursor;
pub mod grid;
pub mod writer;
