pub mod db;

pub use db::{StoreError, init_database};
