//! BigCommerce destination platform adapter

pub mod client;

pub use client::BigCommerceClient;
