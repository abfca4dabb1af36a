use super::{MasterTransport, PeerId, TransportError, WorkerTransport};
use crate::engine::packet::{
    ASSIGNMENT_LEN, Assignment, HELLO_LEN, Hello, RESULT_PACKET_LEN, ResultPacket,
};
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, info, trace};

type Incoming = Result<(PeerId, ResultPacket), TransportError>;

/// Master endpoint over TCP: one connection per worker.
///
/// Every connection gets a reader thread that decodes request frames and funnels
/// them into one queue, so [`MasterTransport::receive_any`] returns requests in
/// arrival order across all workers.
#[derive(Debug)]
pub struct TcpMaster {
    incoming: Receiver<Incoming>,
    streams: Vec<TcpStream>,
    stopped: Vec<bool>,
}

impl TcpMaster {
    /// Blocks until `workers` workers running `board_size` have connected to `listener`.
    ///
    /// Workers are numbered in connection order starting at 1. A worker whose
    /// hello names another board size fails the whole accept, and every
    /// connection made so far is shut down.
    pub fn accept(
        listener: &TcpListener,
        workers: usize,
        board_size: usize,
    ) -> Result<Self, TransportError> {
        let (tx, rx) = mpsc::channel();
        let mut master = Self {
            incoming: rx,
            streams: Vec::with_capacity(workers),
            stopped: vec![false; workers],
        };

        for peer in 1..=workers {
            let (mut stream, addr) = listener
                .accept()
                .map_err(|source| TransportError::Io { peer, source })?;
            info!("Worker {} connected from {}.", peer, addr);
            stream
                .set_nodelay(true)
                .map_err(|source| TransportError::Io { peer, source })?;

            let mut buf = [0u8; HELLO_LEN];
            stream
                .read_exact(&mut buf)
                .map_err(|source| TransportError::Io { peer, source })?;
            let hello = Hello::from_bytes(&buf)?;
            if hello.board_size != board_size {
                let _ = stream.shutdown(Shutdown::Both);
                return Err(TransportError::BoardSizeMismatch {
                    peer,
                    expected: board_size,
                    actual: hello.board_size,
                });
            }

            let reader = stream
                .try_clone()
                .map_err(|source| TransportError::Io { peer, source })?;
            spawn_reader(peer, reader, tx.clone());
            master.streams.push(stream);
        }

        Ok(master)
    }
}

impl Drop for TcpMaster {
    // Reader threads hold clones of each socket, so dropping the streams alone
    // would leave the connections open.
    fn drop(&mut self) {
        for stream in &self.streams {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

fn spawn_reader(peer: PeerId, mut stream: TcpStream, tx: Sender<Incoming>) {
    thread::spawn(move || {
        let mut buf = [0u8; RESULT_PACKET_LEN];
        loop {
            let frame = match stream.read_exact(&mut buf) {
                Ok(()) => Ok((peer, ResultPacket::from_bytes(&buf))),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    Err(TransportError::Disconnected(peer))
                }
                Err(source) => Err(TransportError::Io { peer, source }),
            };
            let failed = frame.is_err();
            if tx.send(frame).is_err() || failed {
                trace!("Reader for worker {} exiting.", peer);
                return;
            }
        }
    });
}

impl MasterTransport for TcpMaster {
    fn worker_count(&self) -> usize {
        self.streams.len()
    }

    fn receive_any(&mut self) -> Result<(PeerId, ResultPacket), TransportError> {
        loop {
            match self.incoming.recv() {
                Ok(Err(
                    TransportError::Disconnected(peer) | TransportError::Io { peer, .. },
                )) if self.stopped[peer - 1] => {
                    debug!("Worker {} closed its connection after stopping.", peer);
                }
                Ok(frame) => return frame,
                Err(_) => return Err(TransportError::Closed),
            }
        }
    }

    fn send(&mut self, peer: PeerId, assignment: Assignment) -> Result<(), TransportError> {
        let index = peer
            .checked_sub(1)
            .filter(|index| *index < self.streams.len())
            .ok_or(TransportError::UnknownPeer(peer))?;
        self.streams[index]
            .write_all(&assignment.to_bytes())
            .map_err(|source| TransportError::Io { peer, source })?;
        if assignment == Assignment::Stop {
            self.stopped[index] = true;
        }
        Ok(())
    }
}

/// Worker endpoint over TCP.
#[derive(Debug)]
pub struct TcpWorker {
    stream: TcpStream,
}

impl TcpWorker {
    /// Connects to the master and announces the board size this worker solves.
    pub fn connect(
        addr: impl ToSocketAddrs + ToString,
        board_size: usize,
    ) -> Result<Self, TransportError> {
        let mut stream = TcpStream::connect(&addr).map_err(|source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        })?;
        stream
            .set_nodelay(true)
            .map_err(|source| TransportError::Io { peer: 0, source })?;
        stream
            .write_all(&Hello { board_size }.to_bytes())
            .map_err(|source| TransportError::Io { peer: 0, source })?;
        Ok(Self { stream })
    }
}

impl WorkerTransport for TcpWorker {
    fn exchange(&mut self, report: ResultPacket) -> Result<Assignment, TransportError> {
        let io_err = |source: std::io::Error| {
            if source.kind() == ErrorKind::UnexpectedEof {
                TransportError::Disconnected(0)
            } else {
                TransportError::Io { peer: 0, source }
            }
        };

        self.stream.write_all(&report.to_bytes()).map_err(io_err)?;
        let mut buf = [0u8; ASSIGNMENT_LEN];
        self.stream.read_exact(&mut buf).map_err(io_err)?;
        Assignment::from_bytes(&buf)
    }
}
