pub mod coingecko;
pub mod notifier;
pub mod price_source;
pub mod runner;
pub mod state_store;

#[cfg(test)]
pub mod testing;
