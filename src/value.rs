//! Snek object representation
//!
//! Every runtime value is an [`Object`] living in an arena slot and addressed
//! by a [`Handle`]. Containers (Vector3, Array) hold handles to their
//! children, never copies, so several containers may share one child and
//! cycles are representable.
//!
//! # Object kinds
//! - Integer: signed 64-bit
//! - Float: 64-bit IEEE
//! - String: owned UTF-8 buffer
//! - Vector3: three non-null child handles, fixed at construction
//! - Array: fixed number of slots, each empty or holding a child handle

use std::fmt;

/// Opaque reference to an arena object
///
/// The generation distinguishes a live object from a later tenant of the
/// same slot, so a handle to a freed object resolves to nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Handle { index, generation }
    }

    /// Slot index in the arena
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation this handle was issued for
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

/// Object kind tag
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Integer = 0,
    Float = 1,
    String = 2,
    Vector3 = 3,
    Array = 4,
}

impl ObjectKind {
    pub const fn name(self) -> &'static str {
        match self {
            ObjectKind::Integer => "integer",
            ObjectKind::Float => "float",
            ObjectKind::String => "string",
            ObjectKind::Vector3 => "vector3",
            ObjectKind::Array => "array",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    Integer(i64),
    Float(f64),
    String(String),
    Vector3 { x: Handle, y: Handle, z: Handle },
    Array(Box<[Option<Handle>]>),
}

impl ObjectData {
    /// Create an array payload with `size` empty slots
    pub fn empty_array(size: usize) -> Self {
        ObjectData::Array(vec![None; size].into_boxed_slice())
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectData::Integer(_) => ObjectKind::Integer,
            ObjectData::Float(_) => ObjectKind::Float,
            ObjectData::String(_) => ObjectKind::String,
            ObjectData::Vector3 { .. } => ObjectKind::Vector3,
            ObjectData::Array(_) => ObjectKind::Array,
        }
    }

    /// Snek `length`: 1 for numbers, byte length for strings,
    /// 3 for vectors, slot count for arrays
    pub fn length(&self) -> usize {
        match self {
            ObjectData::Integer(_) | ObjectData::Float(_) => 1,
            ObjectData::String(s) => s.len(),
            ObjectData::Vector3 { .. } => 3,
            ObjectData::Array(slots) => slots.len(),
        }
    }

    /// Call `visit` once per outgoing reference, in slot order.
    /// A child referenced from several slots is visited once per slot.
    #[inline]
    pub fn visit_edges(&self, mut visit: impl FnMut(Handle)) {
        match self {
            ObjectData::Integer(_) | ObjectData::Float(_) | ObjectData::String(_) => {}
            ObjectData::Vector3 { x, y, z } => {
                visit(*x);
                visit(*y);
                visit(*z);
            }
            ObjectData::Array(slots) => slots.iter().flatten().for_each(|&h| visit(h)),
        }
    }

    /// Number of reference slots (empty array slots included)
    #[inline]
    pub fn edge_count(&self) -> usize {
        match self {
            ObjectData::Integer(_) | ObjectData::Float(_) | ObjectData::String(_) => 0,
            ObjectData::Vector3 { .. } => 3,
            ObjectData::Array(slots) => slots.len(),
        }
    }

    /// Reference held in slot `i`, if any
    #[inline]
    pub fn edge(&self, i: usize) -> Option<Handle> {
        match self {
            ObjectData::Integer(_) | ObjectData::Float(_) | ObjectData::String(_) => None,
            ObjectData::Vector3 { x, y, z } => [*x, *y, *z].get(i).copied(),
            ObjectData::Array(slots) => slots.get(i).copied().flatten(),
        }
    }
}

impl fmt::Display for ObjectData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectData::Integer(i) => write!(f, "{}", i),
            ObjectData::Float(n) => write!(f, "{}", n),
            ObjectData::String(s) => write!(f, "{:?}", s),
            ObjectData::Vector3 { x, y, z } => write!(f, "<{:?}, {:?}, {:?}>", x, y, z),
            ObjectData::Array(slots) => {
                write!(f, "[")?;
                for (i, slot) in slots.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match slot {
                        Some(h) => write!(f, "{:?}", h)?,
                        None => write!(f, "null")?,
                    }
                }
                write!(f, "]")
            }
        }
    }
}

/// A heap object: payload plus bookkeeping for both reclamation regimes
#[derive(Debug, Clone)]
pub struct Object {
    data: ObjectData,
    /// Referencing sites; only maintained by the refcount regime
    refcount: u32,
    /// Reachability bit; only used by the tracing regime
    is_marked: bool,
}

impl Object {
    /// Fresh object: refcount 1, unmarked
    pub fn new(data: ObjectData) -> Self {
        Object {
            data,
            refcount: 1,
            is_marked: false,
        }
    }

    #[inline]
    pub fn data(&self) -> &ObjectData {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut ObjectData {
        &mut self.data
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }

    #[inline]
    pub fn refcount(&self) -> u32 {
        self.refcount
    }

    #[inline]
    pub fn is_marked(&self) -> bool {
        self.is_marked
    }

    #[inline]
    pub(crate) fn set_marked(&mut self, marked: bool) {
        self.is_marked = marked;
    }

    /// Add a reference. A count that reaches `u32::MAX` sticks there.
    #[inline]
    pub(crate) fn inc_ref(&mut self) {
        self.refcount = self.refcount.saturating_add(1);
    }

    /// Decrement and return the new count.
    ///
    /// A stuck count is never decremented, so the object is never freed
    /// by reference counting.
    #[inline]
    pub(crate) fn dec_ref(&mut self) -> u32 {
        if self.refcount != u32::MAX {
            self.refcount = self.refcount.saturating_sub(1);
        }
        self.refcount
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.data {
            ObjectData::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.data {
            ObjectData::Float(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ObjectData::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<[Handle; 3]> {
        match self.data {
            ObjectData::Vector3 { x, y, z } => Some([x, y, z]),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Option<Handle>]> {
        match &self.data {
            ObjectData::Array(slots) => Some(slots),
            _ => None,
        }
    }
}
