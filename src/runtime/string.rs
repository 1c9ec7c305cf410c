//! Snek string operations
//!
//! Strings own their UTF-8 buffer. Concatenation always produces a new
//! buffer; operands are never modified.

use super::ObjectError;

/// Concatenate into a freshly allocated buffer
pub fn concat(a: &str, b: &str) -> Result<String, ObjectError> {
    let len = a.len().checked_add(b.len()).ok_or(ObjectError::AllocationFailure)?;
    let mut buf = String::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ObjectError::AllocationFailure)?;
    buf.push_str(a);
    buf.push_str(b);
    Ok(buf)
}
