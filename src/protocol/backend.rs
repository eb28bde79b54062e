//! Serial dispatch of transport messages onto an engine
//!
//! The backend owns its engine exclusively; batches and queries are applied
//! in arrival order, so a query issued after a batch observes the
//! post-batch state.

use glam::Vec3;

use crate::core::types::Result;
use crate::math::{Aabb, Frustum, Ray};
use crate::protocol::{Command, Message, Payload, Query};
use crate::tree::{Octree, OctreeConfig, RayHit};

/// One engine behind a message boundary
pub struct Backend {
    engine: Octree,
    /// Reused between raycast queries
    hits: Vec<RayHit>,
}

impl Backend {
    pub fn new(config: OctreeConfig) -> Self {
        Self {
            engine: Octree::new(config),
            hits: Vec::new(),
        }
    }

    /// The readiness signal. This must be the first message a transport
    /// delivers after constructing the backend.
    pub fn ready() -> Message {
        Message::Ready { ready: true }
    }

    pub fn engine(&self) -> &Octree {
        &self.engine
    }

    /// Apply one mutation command
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Insert { id, min, max } => {
                self.engine.insert(&aabb_from(min, max), *id);
            }
            // remove messages carry no bounds, so the search is unpruned
            Command::Remove { id } => self.engine.remove_by_id(*id),
            Command::Update { id, min, max } => {
                self.engine.update(&aabb_from(min, max), *id);
            }
        }
    }

    /// Apply an ordered batch of commands
    pub fn apply_batch(&mut self, batch: &[Command]) {
        for command in batch {
            self.apply(command);
        }
    }

    /// Answer one query against current state
    pub fn handle(&mut self, query: &Query) -> Result<Message> {
        let payload = match query {
            Query::Raycast { origin, direction, .. } => {
                let ray = Ray::new(Vec3::from_array(*origin), Vec3::from_array(*direction));
                self.engine.raycast(&ray, &mut self.hits);
                Payload::Hits(self.hits.clone())
            }
            Query::AabbQuery { min, max, .. } => {
                let mut ids = Vec::new();
                self.engine.aabb_query(&aabb_from(min, max), |id| ids.push(id));
                Payload::Ids(ids)
            }
            Query::FrustumQuery { planes, .. } => {
                let frustum = Frustum::from_interleaved(planes)?;
                let mut ids = Vec::new();
                self.engine.frustum_query(&frustum, |id| ids.push(id));
                Payload::Ids(ids)
            }
        };
        Ok(Message::Reply {
            id: query.correlation_id(),
            payload,
        })
    }

    /// Decode a JSON query, answer it, and encode the reply
    pub fn handle_json(&mut self, raw: &str) -> Result<String> {
        let query: Query = serde_json::from_str(raw)?;
        let reply = self.handle(&query)?;
        Ok(serde_json::to_string(&reply)?)
    }
}

fn aabb_from(min: &[f32; 3], max: &[f32; 3]) -> Aabb {
    Aabb::new(Vec3::from_array(*min), Vec3::from_array(*max))
}
