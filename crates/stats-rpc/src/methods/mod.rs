//! RPC method implementations, grouped by namespace

pub mod stats;
