pub mod db;

pub use db::CardStore;
