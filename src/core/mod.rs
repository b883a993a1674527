pub mod auth;
pub mod extractor;
pub mod faucet;
pub mod gateway;
pub mod listener;
pub mod sink;
