//! Worker transport boundary
//!
//! Command-oriented wire protocol for driving an engine across a message
//! boundary. Mutations arrive as ordered batches of fire-and-forget
//! [`Command`]s; reads are correlated [`Query`]/[`Message::Reply`] pairs.
//! The correlation id is a monotonic counter on the requesting side and is
//! unrelated to object ids.

pub mod backend;

use serde::{Deserialize, Serialize};

use crate::tree::RayHit;

pub use backend::Backend;

/// Fire-and-forget mutation command
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum Command {
    Insert {
        /// Object id; a missing field reads as 0
        #[serde(default)]
        id: i32,
        min: [f32; 3],
        max: [f32; 3],
    },
    Remove {
        id: i32,
    },
    Update {
        id: i32,
        min: [f32; 3],
        max: [f32; 3],
    },
}

/// Correlated read request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Query {
    Raycast {
        id: u32,
        origin: [f32; 3],
        direction: [f32; 3],
    },
    AabbQuery {
        id: u32,
        min: [f32; 3],
        max: [f32; 3],
    },
    /// `planes` holds 24 floats, four per plane as
    /// (normal_x, normal_y, normal_z, constant)
    FrustumQuery {
        id: u32,
        planes: Vec<f32>,
    },
}

impl Query {
    /// Correlation id echoed in the reply
    pub fn correlation_id(&self) -> u32 {
        match self {
            Query::Raycast { id, .. } => *id,
            Query::AabbQuery { id, .. } => *id,
            Query::FrustumQuery { id, .. } => *id,
        }
    }
}

/// Reply payload, shaped per query kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Raycast results
    Hits(Vec<RayHit>),
    /// AABB / frustum query results
    Ids(Vec<i32>),
}

/// Outbound message from the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// Readiness signal, sent once before any reply; proxies buffer
    /// requests until they see it
    Ready { ready: bool },
    /// Correlated query reply; `id` echoes the request correlation id
    Reply { id: u32, payload: Payload },
}
