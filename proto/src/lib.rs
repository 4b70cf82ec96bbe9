//! Debug event wire format for the paddle contact core
//!
//! Uses postcard for compact binary serialization, so recorded sessions and
//! live visualizers can consume contact events without linking the core.

use postcard::{from_bytes, to_allocvec};

/// Which path produced a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContactKind {
    /// Reported by the host's own collision pass
    Native,
    /// Paddle-motion sphere sweep
    SweptVolume,
    /// Face-normal probe ray
    ProbeGrid,
}

impl ContactKind {
    pub fn is_correction(&self) -> bool {
        !matches!(self, ContactKind::Native)
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DebugEvent {
    /// A response was applied to a ball
    Contact {
        tick: u32,
        ball: u64,
        source: ContactKind,
        point: [f32; 3],
        normal: [f32; 3], // paddle -> ball
        magnitude: f32,
    },

    /// A slow collision brought a ball to rest
    BallStopped { tick: u32, ball: u64 },

    /// The feeder fired a new ball
    BallLaunched { tick: u32, ball: u64 },

    /// A launched ball's lifetime ran out and it was despawned
    BallExpired { tick: u32, ball: u64 },
}

/// One tick's worth of events
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DebugFrame {
    pub tick: u32,
    pub events: Vec<DebugEvent>,
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl DebugEvent {
    pub fn tick(&self) -> u32 {
        match self {
            DebugEvent::Contact { tick, .. }
            | DebugEvent::BallStopped { tick, .. }
            | DebugEvent::BallLaunched { tick, .. }
            | DebugEvent::BallExpired { tick, .. } => *tick,
        }
    }

    /// Serialize a single event to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize a single event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

impl DebugFrame {
    pub fn new(tick: u32, events: Vec<DebugEvent>) -> Self {
        Self { tick, events }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_serialization() {
        let msg = DebugEvent::Contact {
            tick: 42,
            ball: 7,
            source: ContactKind::SweptVolume,
            point: [0.0, 1.0, 0.5],
            normal: [0.0, 0.0, 1.0],
            magnitude: 0.5,
        };
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        let decoded = DebugEvent::from_bytes(&bytes).expect("Deserialization should succeed");
        match decoded {
            DebugEvent::Contact {
                tick,
                source,
                magnitude,
                ..
            } => {
                assert_eq!(tick, 42);
                assert_eq!(source, ContactKind::SweptVolume);
                assert_eq!(magnitude, 0.5);
            }
            _ => panic!("Message type mismatch"),
        }
    }

    #[test]
    fn test_frame_keeps_event_order() {
        let frame = DebugFrame::new(
            9,
            vec![
                DebugEvent::BallLaunched { tick: 9, ball: 1 },
                DebugEvent::BallStopped { tick: 9, ball: 2 },
                DebugEvent::BallExpired { tick: 9, ball: 1 },
            ],
        );
        let bytes = frame.to_bytes().expect("Serialization should succeed");
        let decoded = DebugFrame::from_bytes(&bytes).expect("Deserialization should succeed");
        assert_eq!(decoded, frame);
        assert!(decoded.events.iter().all(|e| e.tick() == 9));
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let bytes = DebugEvent::BallStopped { tick: 1, ball: 3 }
            .to_bytes()
            .expect("Serialization should succeed");
        assert!(DebugEvent::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_correction_kinds() {
        assert!(!ContactKind::Native.is_correction());
        assert!(ContactKind::SweptVolume.is_correction());
        assert!(ContactKind::ProbeGrid.is_correction());
    }
}
