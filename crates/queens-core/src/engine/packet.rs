use super::decompose::JobId;
use super::transport::TransportError;
use std::time::Duration;

/// Encoded size of a [`ResultPacket`]: i32 job id, i64 count, i64 microseconds.
pub const RESULT_PACKET_LEN: usize = 20;

/// Encoded size of an [`Assignment`]: one i32 job id.
pub const ASSIGNMENT_LEN: usize = 4;

/// Encoded size of a [`Hello`]: one i32 board size.
pub const HELLO_LEN: usize = 4;

/// First frame a networked worker sends, before any request.
///
/// Master and worker derive their job lists independently, so they must agree
/// on the board size before a job id means the same prefix to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hello {
    pub board_size: usize,
}

impl Hello {
    pub fn to_bytes(&self) -> [u8; HELLO_LEN] {
        (self.board_size as i32).to_le_bytes()
    }

    pub fn from_bytes(buf: &[u8; HELLO_LEN]) -> Result<Self, TransportError> {
        match i32::from_le_bytes(*buf) {
            n if n > 0 => Ok(Hello {
                board_size: n as usize,
            }),
            n => Err(TransportError::Malformed {
                kind: "hello",
                reason: format!("board size {}", n),
            }),
        }
    }
}

/// The outcome of one job, carried by the worker's next request.
///
/// Every field is written little-endian so master and workers agree on the
/// layout regardless of host byte order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultPacket {
    /// Finished job, or 0 when the request carries no result.
    pub job_id: i32,
    pub solutions: i64,
    pub elapsed_us: i64,
}

impl ResultPacket {
    /// The packet sent on first contact.
    pub const EMPTY: Self = Self {
        job_id: 0,
        solutions: 0,
        elapsed_us: 0,
    };

    pub fn new(job: JobId, solutions: u64, elapsed: Duration) -> Self {
        Self {
            job_id: job as i32,
            solutions: solutions as i64,
            elapsed_us: i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.job_id == 0
    }

    pub fn to_bytes(&self) -> [u8; RESULT_PACKET_LEN] {
        let mut buf = [0u8; RESULT_PACKET_LEN];
        buf[0..4].copy_from_slice(&self.job_id.to_le_bytes());
        buf[4..12].copy_from_slice(&self.solutions.to_le_bytes());
        buf[12..20].copy_from_slice(&self.elapsed_us.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; RESULT_PACKET_LEN]) -> Self {
        let mut job_id = [0u8; 4];
        let mut solutions = [0u8; 8];
        let mut elapsed_us = [0u8; 8];
        job_id.copy_from_slice(&buf[0..4]);
        solutions.copy_from_slice(&buf[4..12]);
        elapsed_us.copy_from_slice(&buf[12..20]);
        Self {
            job_id: i32::from_le_bytes(job_id),
            solutions: i64::from_le_bytes(solutions),
            elapsed_us: i64::from_le_bytes(elapsed_us),
        }
    }
}

/// The master's reply to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Job(JobId),
    /// No work remains; encoded as job id 0.
    Stop,
}

impl Assignment {
    pub fn wire_id(&self) -> i32 {
        match self {
            Assignment::Job(job) => *job as i32,
            Assignment::Stop => 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; ASSIGNMENT_LEN] {
        self.wire_id().to_le_bytes()
    }

    pub fn from_bytes(buf: &[u8; ASSIGNMENT_LEN]) -> Result<Self, TransportError> {
        match i32::from_le_bytes(*buf) {
            0 => Ok(Assignment::Stop),
            id if id > 0 => Ok(Assignment::Job(id as JobId)),
            id => Err(TransportError::Malformed {
                kind: "assignment",
                reason: format!("negative job id {}", id),
            }),
        }
    }
}
