pub mod dispatch;
pub mod list;
pub mod pending;
pub mod sync;
