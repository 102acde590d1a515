pub mod analyzers;
pub mod browse;
pub mod city;
pub mod filters;
pub mod loader;
pub mod output;
pub mod prompt;
pub mod session;
pub mod trips;
