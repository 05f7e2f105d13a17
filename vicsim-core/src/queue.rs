//! Bounded multi-producer queue between command submission and the tick.
//!
//! Every handle shares one channel, so the order in which `enqueue` calls
//! complete across threads is the single global execution order.

use crate::input::Payload;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct CommandQueue {
    tx: Sender<Payload>,
    rx: Receiver<Payload>,
    capacity: usize,
}

impl CommandQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Appends a payload without blocking. Returns `false` when the queue is
    /// full; the payload is dropped and nothing else changes.
    pub fn enqueue(&self, payload: Payload) -> bool {
        match self.tx.try_send(payload) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                log::debug!(
                    "Command queue full ({}), dropping {:?} from {}",
                    self.capacity,
                    dropped.command.kind(),
                    dropped.source
                );
                false
            }
            // Unreachable while `self` holds the receiver.
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Removes and returns the oldest payload.
    pub fn pop(&self) -> Option<Payload> {
        self.rx.try_recv().ok()
    }

    /// Yields the payloads queued when the drain starts, in FIFO order,
    /// removing each as it is yielded.
    ///
    /// Payloads enqueued while draining stay queued for the next drain, so a
    /// busy producer cannot keep one drain running.
    pub fn drain(&self) -> impl Iterator<Item = Payload> + '_ {
        let pending = self.rx.len();
        self.rx.try_iter().take(pending)
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Command;
    use crate::state::{NationId, TechId};
    use std::thread;

    fn research(source: u16, tech: u16) -> Payload {
        Payload::new(NationId(source), Command::StartResearch { tech: TechId(tech) })
    }

    #[test]
    fn test_fifo_order() {
        let q = CommandQueue::with_capacity(8);
        for i in 0..5 {
            assert!(q.enqueue(research(0, i)));
        }
        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained, (0..5).map(|i| research(0, i)).collect::<Vec<_>>());
        assert!(q.is_empty());
    }

    #[test]
    fn test_enqueue_beyond_capacity_fails() {
        let q = CommandQueue::with_capacity(2);
        assert!(q.enqueue(research(0, 1)));
        assert!(q.enqueue(research(0, 2)));
        assert!(!q.enqueue(research(0, 3)));
        assert_eq!(q.len(), 2);

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained, vec![research(0, 1), research(0, 2)]);
    }

    #[test]
    fn test_drain_empty_yields_nothing() {
        let q = CommandQueue::default();
        assert_eq!(q.drain().count(), 0);
        assert_eq!(q.pop(), None);
        assert_eq!(q.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_enqueue_during_drain_waits_for_next_drain() {
        let q = CommandQueue::with_capacity(8);
        let producer = q.clone();
        assert!(q.enqueue(research(0, 1)));
        assert!(q.enqueue(research(0, 2)));

        let mut drained = Vec::new();
        for payload in q.drain() {
            assert!(producer.enqueue(research(1, payload.source.0 + 10)));
            drained.push(payload);
        }
        assert_eq!(drained, vec![research(0, 1), research(0, 2)]);
        assert_eq!(q.len(), 2);

        let next: Vec<_> = q.drain().collect();
        assert_eq!(next, vec![research(1, 10), research(1, 10)]);
    }

    #[test]
    fn test_cloned_handles_share_channel() {
        let q = CommandQueue::with_capacity(4);
        let producer = q.clone();
        assert!(producer.enqueue(research(1, 7)));
        assert_eq!(q.pop(), Some(research(1, 7)));
    }

    #[test]
    fn test_producers_happens_before_order() {
        let q = CommandQueue::with_capacity(64);

        let first = q.clone();
        thread::spawn(move || {
            for i in 0..10 {
                assert!(first.enqueue(research(1, i)));
            }
        })
        .join()
        .unwrap();

        let second = q.clone();
        thread::spawn(move || {
            for i in 0..10 {
                assert!(second.enqueue(research(2, i)));
            }
        })
        .join()
        .unwrap();

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained.len(), 20);
        assert!(drained[..10].iter().all(|p| p.source == NationId(1)));
        assert!(drained[10..].iter().all(|p| p.source == NationId(2)));
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let q = CommandQueue::with_capacity(400);
        let handles: Vec<_> = (0..4u16)
            .map(|n| {
                let q = q.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        assert!(q.enqueue(research(n, i)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained.len(), 400);
        // Per-producer order survives interleaving.
        for n in 0..4u16 {
            let techs: Vec<u16> = drained
                .iter()
                .filter(|p| p.source == NationId(n))
                .map(|p| match p.command {
                    Command::StartResearch { tech } => tech.0,
                    _ => unreachable!(),
                })
                .collect();
            assert_eq!(techs, (0..100).collect::<Vec<_>>());
        }
    }
}
