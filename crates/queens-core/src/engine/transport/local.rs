use super::{MasterTransport, PeerId, TransportError, WorkerTransport};
use crate::engine::packet::{Assignment, ResultPacket};
use std::sync::mpsc::{self, Receiver, Sender};

/// Master endpoint of an in-process cluster.
#[derive(Debug)]
pub struct LocalMaster {
    requests: Receiver<(PeerId, ResultPacket)>,
    replies: Vec<Sender<Assignment>>,
}

/// Worker endpoint of an in-process cluster.
#[derive(Debug)]
pub struct LocalWorker {
    peer: PeerId,
    requests: Sender<(PeerId, ResultPacket)>,
    replies: Receiver<Assignment>,
}

impl LocalWorker {
    pub fn peer(&self) -> PeerId {
        self.peer
    }
}

/// Wires one master to `workers` workers numbered `1..=workers`.
///
/// All workers share a single request queue, which gives the master its
/// receive-from-any semantics; each worker has a private reply queue.
pub fn channel_cluster(workers: usize) -> (LocalMaster, Vec<LocalWorker>) {
    let (request_tx, request_rx) = mpsc::channel();
    let mut replies = Vec::with_capacity(workers);
    let mut endpoints = Vec::with_capacity(workers);

    for peer in 1..=workers {
        let (reply_tx, reply_rx) = mpsc::channel();
        replies.push(reply_tx);
        endpoints.push(LocalWorker {
            peer,
            requests: request_tx.clone(),
            replies: reply_rx,
        });
    }

    let master = LocalMaster {
        requests: request_rx,
        replies,
    };
    (master, endpoints)
}

impl MasterTransport for LocalMaster {
    fn worker_count(&self) -> usize {
        self.replies.len()
    }

    fn receive_any(&mut self) -> Result<(PeerId, ResultPacket), TransportError> {
        self.requests.recv().map_err(|_| TransportError::Closed)
    }

    fn send(&mut self, peer: PeerId, assignment: Assignment) -> Result<(), TransportError> {
        let reply = peer
            .checked_sub(1)
            .and_then(|index| self.replies.get(index))
            .ok_or(TransportError::UnknownPeer(peer))?;
        reply
            .send(assignment)
            .map_err(|_| TransportError::Disconnected(peer))
    }
}

impl WorkerTransport for LocalWorker {
    fn exchange(&mut self, report: ResultPacket) -> Result<Assignment, TransportError> {
        self.requests
            .send((self.peer, report))
            .map_err(|_| TransportError::Disconnected(0))?;
        self.replies
            .recv()
            .map_err(|_| TransportError::Disconnected(0))
    }
}
