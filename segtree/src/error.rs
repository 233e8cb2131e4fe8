use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SegtreeError {
    #[error("index {index} out of range for segment tree of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// 添字は範囲内だが、その葉に一度も値が書き込まれていない。
    #[error("value at index {index} is uninitialized")]
    Uninitialized { index: usize },
    #[error("source has {found} elements but the segment tree has length {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

pub type Result<T, E = SegtreeError> = std::result::Result<T, E>;

/// `pos < len`なら根を返す。
pub(crate) fn root_for(pos: usize, len: usize) -> Result<crate::index::Segment> {
    match crate::index::Segment::root(len) {
        Some(root) if pos < len => Ok(root),
        _ => {
            tracing::debug!(index = pos, len, "rejected out-of-range position");
            Err(SegtreeError::IndexOutOfBounds { index: pos, len })
        }
    }
}
