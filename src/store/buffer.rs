//! Owned-or-borrowed vertex/face storage

use crate::errors::{SdfError, SdfResult};
use std::ops::{Deref, DerefMut};

/// Backing storage of a mesh buffer.
///
/// The variant is fixed when the engine is constructed:
/// - `Owned`: the engine holds its own copy; edits never reach caller data.
/// - `View`: the engine edits the caller's slice in place. The borrow keeps
///   the backing memory alive for as long as the engine exists.
#[derive(Debug)]
pub enum Buffer<'a, T> {
    Owned(Vec<T>),
    View(&'a mut [T]),
}

impl<T> Buffer<'_, T> {
    /// Whether this buffer owns its data
    pub const fn is_owned(&self) -> bool {
        matches!(self, Buffer::Owned(_))
    }
}

impl<T: Copy> Buffer<'_, T> {
    /// Replace the contents with `data`.
    ///
    /// Owned buffers take `data` as is. Views can only be overwritten
    /// element-wise, so `data` must match the view's length.
    pub fn replace(&mut self, buffer: &'static str, data: Vec<T>) -> SdfResult<()> {
        match self {
            Buffer::Owned(v) => {
                *v = data;
                Ok(())
            },
            Buffer::View(s) if s.len() == data.len() => {
                s.copy_from_slice(&data);
                Ok(())
            },
            Buffer::View(s) => Err(SdfError::ViewNotResizable {
                buffer,
                expected: s.len(),
                actual: data.len(),
            }),
        }
    }
}

impl<T> Deref for Buffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            Buffer::Owned(v) => v,
            Buffer::View(s) => s,
        }
    }
}

impl<T> DerefMut for Buffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            Buffer::Owned(v) => v,
            Buffer::View(s) => s,
        }
    }
}
