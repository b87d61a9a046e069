pub mod migrations;
pub mod postgres;
pub mod seed;
