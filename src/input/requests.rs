//! Spawn-request channel between input producers and the render frame.
//!
//! The motion detector (capture cadence) and pointer handlers send requests;
//! the scene drains them in order at the start of each render frame. Several
//! requests may queue between two frames. Producers never touch the pool.

use std::sync::mpsc;

use glam::Vec2;

use crate::motion::MotionEvent;

/// A discrete request to spawn particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    /// Webcam gesture: a jittered trail cluster scaled by intensity
    Motion(MotionEvent),
    /// Pointer click at an NDC position: a firework burst on the hit volume
    Click(Vec2),
}

/// Create a connected sender/receiver pair
pub fn spawn_channel() -> (SpawnRequestSender, SpawnRequestReceiver) {
    let (tx, rx) = mpsc::channel();
    (SpawnRequestSender { tx }, SpawnRequestReceiver { rx })
}

/// Cloneable, `Send` producer handle
#[derive(Debug, Clone)]
pub struct SpawnRequestSender {
    tx: mpsc::Sender<SpawnRequest>,
}

impl SpawnRequestSender {
    /// Queue a request. Returns `false` if the receiving scene is gone.
    pub fn send(&self, request: SpawnRequest) -> bool {
        self.tx.send(request).is_ok()
    }
}

/// Consumer end, owned by the render-frame domain
#[derive(Debug)]
pub struct SpawnRequestReceiver {
    rx: mpsc::Receiver<SpawnRequest>,
}

impl SpawnRequestReceiver {
    /// Every request queued so far, oldest first. Never blocks.
    pub fn drain(&self) -> impl Iterator<Item = SpawnRequest> + '_ {
        self.rx.try_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_drain_in_order() {
        let (tx, rx) = spawn_channel();
        let first = MotionEvent { x: 0.1, y: 0.2, intensity: 20.0 };
        let second = MotionEvent { x: -0.5, y: 0.5, intensity: 60.0 };

        assert!(tx.send(SpawnRequest::Motion(first)));
        assert!(tx.send(SpawnRequest::Click(Vec2::new(0.3, -0.3))));
        assert!(tx.send(SpawnRequest::Motion(second)));

        let drained: Vec<_> = rx.drain().collect();
        assert_eq!(
            drained,
            vec![
                SpawnRequest::Motion(first),
                SpawnRequest::Click(Vec2::new(0.3, -0.3)),
                SpawnRequest::Motion(second),
            ]
        );
        assert_eq!(rx.drain().count(), 0);
    }

    #[test]
    fn test_send_from_another_thread() {
        let (tx, rx) = spawn_channel();
        let producer = tx.clone();
        std::thread::spawn(move || {
            for i in 0..10 {
                producer.send(SpawnRequest::Motion(MotionEvent {
                    x: 0.0,
                    y: 0.0,
                    intensity: i as f32,
                }));
            }
        })
        .join()
        .expect("producer thread");

        let intensities: Vec<f32> = rx
            .drain()
            .filter_map(|request| match request {
                SpawnRequest::Motion(event) => Some(event.intensity),
                SpawnRequest::Click(_) => None,
            })
            .collect();
        assert_eq!(intensities, (0..10).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_send_fails_after_receiver_dropped() {
        let (tx, rx) = spawn_channel();
        drop(rx);
        assert!(!tx.send(SpawnRequest::Click(Vec2::ZERO)));
    }
}
