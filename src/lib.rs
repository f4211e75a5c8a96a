pub mod acquire;
pub mod aggregator;
pub mod extract;
pub mod fetch;
pub mod lookup;
pub mod metrics;
pub mod output;
pub mod record;
pub mod store;
