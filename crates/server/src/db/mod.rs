pub mod matches;
pub mod pool;
pub mod users;
