//! Op code handlers
//!
//! Handles incoming WebSocket frames based on their operation code.

mod error;
mod heartbeat;
mod identify;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use identify::IdentifyHandler;

use crate::connection::Connection;
use crate::protocol::{GatewayMessage, OpCode};
use crate::server::GatewayState;
use std::sync::Arc;

/// Routes client frames to their handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<()> {
        match message.op {
            OpCode::Identify => {
                let payload = message.as_identify().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Identify payload".to_string())
                })?;

                IdentifyHandler::handle(state, connection, payload).await
            }
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Heartbeat payload".to_string())
                })?;

                HeartbeatHandler::handle(connection, seq).await
            }
            OpCode::Dispatch | OpCode::Hello | OpCode::HeartbeatAck => {
                Err(HandlerError::ServerOnlyOpcode(message.op))
            }
        }
    }
}
