pub mod geocode;
pub mod link;
pub mod rows;
