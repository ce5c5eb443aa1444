pub mod demo;
mod provider;
mod storage;
mod universe;

pub use {
    provider::{MarketDataProvider, StoreProvider},
    storage::{MarketDataStorage, SqliteStorage},
    universe::load_universe,
};
