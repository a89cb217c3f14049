//! WooCommerce source platform adapter

pub mod client;

pub use client::WooCommerceClient;
