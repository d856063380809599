pub mod admin;
pub mod catalog;
pub mod draws;
pub mod settlement;
pub mod tickets;
pub mod wallet;
