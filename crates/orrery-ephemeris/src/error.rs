//! Ephemeris error types.

use orrery_frames::BodyId;

/// Errors from trajectory evaluation and ephemeris file loading.
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    /// Query time outside a trajectory's validity interval. Trajectories
    /// never extrapolate; callers must pre-validate or clamp.
    #[error("time {t} s outside trajectory validity [{t0}, {t1}) for {body}")]
    OutOfRange { body: BodyId, t: f64, t0: f64, t1: f64 },

    /// No trajectory for the requested body in this ephemeris.
    #[error("no trajectory for {0}")]
    UnknownBody(BodyId),

    /// File too short to contain the fixed-offset header.
    #[error("ephemeris header truncated: {len} bytes, need at least {needed}")]
    TruncatedHeader { len: usize, needed: usize },

    /// Header fields describe a record size that does not tile the file.
    #[error("record size mismatch: {record_bytes}-byte records do not tile {file_bytes} bytes of data")]
    RecordSizeMismatch { record_bytes: usize, file_bytes: usize },

    /// A pointer-table row points outside the record.
    #[error("item {item} coefficient pointer out of bounds: offset {offset}, record holds {record_len} doubles")]
    PointerOutOfBounds {
        item: usize,
        offset: usize,
        record_len: usize,
    },

    /// Nonsensical header field (zero step, inverted time span, ...).
    #[error("invalid ephemeris header: {0}")]
    InvalidHeader(&'static str),

    /// Failed to read the ephemeris file from disk.
    #[error("failed to read ephemeris: {0}")]
    Io(#[from] std::io::Error),
}
