// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod dispatch_repo;
pub mod models;
pub mod presentation;
pub mod routes;
pub mod worker;
