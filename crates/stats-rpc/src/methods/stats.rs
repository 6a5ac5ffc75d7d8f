//! Stats namespace RPC methods (Stats.*)

use std::sync::Arc;

use serde_json::Value;

use crate::error::JsonRpcError;
use crate::handler::RpcContext;
use crate::types::parse_sample;

/// Method name for sample ingestion
pub const UPDATE_METHOD: &str = "Stats.Update";

/// Name older clients call; same handler as [`UPDATE_METHOD`]
pub const LEGACY_UPDATE_METHOD: &str = "Server.Update";

/// Stats.Update - Appends one sample to the store
///
/// Any well-formed sample is accepted; the result is an empty ack.
pub async fn stats_update(ctx: Arc<RpcContext>, params: Value) -> Result<Value, JsonRpcError> {
    let sample = parse_sample(params)?;
    tracing::trace!(
        process = %sample.process,
        series = %sample.series,
        value = sample.value,
        "sample received"
    );
    ctx.store.append_sample(&sample);
    Ok(Value::Null)
}
