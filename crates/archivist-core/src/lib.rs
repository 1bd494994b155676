pub mod accumulator;
pub mod archiver;
pub mod config;
pub mod coordinates;
pub mod datatable;
pub mod enricher;
pub mod error;
pub mod log;
pub mod metrics;
pub mod period;
pub mod processor;
pub mod referer;
pub mod rollup;
pub mod row;

#[cfg(test)]
mod testing;
