//! Object construction
//!
//! Every constructor allocates exactly one arena object with refcount 1 and
//! no mark, then registers it with the owning space.

use super::{ObjectError, ObjectSpace};
use crate::value::{Handle, ObjectData};

/// Allocate and register; on registration failure the slot is released again
pub(crate) fn alloc<S: ObjectSpace + ?Sized>(
    space: &mut S,
    data: ObjectData,
) -> Result<Handle, ObjectError> {
    let handle = space.arena_mut().alloc(data)?;
    if let Err(err) = space.register(handle) {
        space.arena_mut().free(handle);
        return Err(err);
    }
    Ok(handle)
}

pub fn new_integer<S: ObjectSpace + ?Sized>(space: &mut S, value: i64) -> Result<Handle, ObjectError> {
    alloc(space, ObjectData::Integer(value))
}

pub fn new_float<S: ObjectSpace + ?Sized>(space: &mut S, value: f64) -> Result<Handle, ObjectError> {
    alloc(space, ObjectData::Float(value))
}

pub fn new_string<S: ObjectSpace + ?Sized>(space: &mut S, value: &str) -> Result<Handle, ObjectError> {
    let mut buf = String::new();
    buf.try_reserve_exact(value.len())
        .map_err(|_| ObjectError::AllocationFailure)?;
    buf.push_str(value);
    alloc(space, ObjectData::String(buf))
}

/// Each component slot is a referencing site, so `x == y` retains twice.
pub fn new_vector3<S: ObjectSpace + ?Sized>(
    space: &mut S,
    x: Handle,
    y: Handle,
    z: Handle,
) -> Result<Handle, ObjectError> {
    let arena = space.arena();
    if !(arena.contains(x) && arena.contains(y) && arena.contains(z)) {
        return Err(ObjectError::NullInput);
    }

    let handle = alloc(space, ObjectData::Vector3 { x, y, z })?;
    space.retain(x);
    space.retain(y);
    space.retain(z);
    Ok(handle)
}

pub fn new_array<S: ObjectSpace + ?Sized>(space: &mut S, size: usize) -> Result<Handle, ObjectError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(size)
        .map_err(|_| ObjectError::AllocationFailure)?;
    slots.resize(size, None);
    alloc(space, ObjectData::Array(slots.into_boxed_slice()))
}

/// Fresh object with the same kind and payload as `source`.
///
/// Children are shared, not copied: each one gains a referencing site.
pub(crate) fn shallow_copy<S: ObjectSpace + ?Sized>(
    space: &mut S,
    source: Handle,
) -> Result<Handle, ObjectError> {
    let data = space
        .object(source)
        .ok_or(ObjectError::NullInput)?
        .data()
        .clone();

    let handle = alloc(space, data)?;
    for i in 0..space.object(handle).map_or(0, |o| o.data().edge_count()) {
        if let Some(child) = space.object(handle).and_then(|o| o.data().edge(i)) {
            space.retain(child);
        }
    }
    Ok(handle)
}

pub fn length<S: ObjectSpace + ?Sized>(space: &S, handle: Handle) -> Option<usize> {
    space.object(handle).map(|o| o.data().length())
}

#[cfg(test)]
mod tests {
    use crate::refcount::RcHeap;
    use crate::runtime::{ObjectError, ObjectSpace};
    use crate::value::ObjectKind;
    use crate::vm::Vm;

    #[test]
    fn test_constructors() {
        let mut heap = RcHeap::new();

        let i = heap.new_integer(-7).unwrap();
        let f = heap.new_float(2.5).unwrap();
        let s = heap.new_string("Sneklang").unwrap();
        let a = heap.new_array(3).unwrap();

        assert_eq!(heap.object(i).unwrap().as_integer(), Some(-7));
        assert_eq!(heap.object(f).unwrap().as_float(), Some(2.5));
        assert_eq!(heap.object(s).unwrap().as_str(), Some("Sneklang"));
        assert_eq!(heap.object(a).unwrap().kind(), ObjectKind::Array);
        assert_eq!(heap.array_get(a, 0), None);

        for h in [i, f, s, a] {
            assert_eq!(heap.refcount(h), Some(1));
            assert!(!heap.object(h).unwrap().is_marked());
        }
    }

    #[test]
    fn test_length() {
        let mut vm = Vm::new();

        let i = vm.new_integer(1).unwrap();
        let f = vm.new_float(1.0).unwrap();
        let s = vm.new_string("Teej").unwrap();
        let v = vm.new_vector3(i, i, f).unwrap();
        let a = vm.new_array(5).unwrap();
        let empty = vm.new_array(0).unwrap();

        assert_eq!(vm.length(i), Some(1));
        assert_eq!(vm.length(f), Some(1));
        assert_eq!(vm.length(s), Some(4));
        assert_eq!(vm.length(v), Some(3));
        assert_eq!(vm.length(a), Some(5));
        assert_eq!(vm.length(empty), Some(0));
    }

    #[test]
    fn test_vector3_retains_per_slot() {
        let mut heap = RcHeap::new();

        let x = heap.new_integer(1).unwrap();
        let y = heap.new_integer(2).unwrap();
        let v = heap.new_vector3(x, x, y).unwrap();

        assert_eq!(heap.object(v).unwrap().as_vector3(), Some([x, x, y]));
        assert_eq!(heap.refcount(x), Some(3));
        assert_eq!(heap.refcount(y), Some(2));
    }

    #[test]
    fn test_vector3_rejects_freed_component() {
        let mut heap = RcHeap::new();

        let x = heap.new_integer(1).unwrap();
        let gone = heap.new_integer(2).unwrap();
        heap.refcount_dec(gone);

        assert_eq!(heap.new_vector3(x, gone, x), Err(ObjectError::NullInput));
        assert_eq!(heap.refcount(x), Some(1));
        assert_eq!(heap.live_objects(), 1);
    }

    #[test]
    fn test_oversized_array_is_allocation_failure() {
        let mut heap = RcHeap::new();
        heap.new_integer(1).unwrap();

        assert_eq!(
            heap.new_array(usize::MAX),
            Err(ObjectError::AllocationFailure)
        );
        assert_eq!(heap.live_objects(), 1);

        let mut vm = Vm::new();
        vm.new_integer(1).unwrap();

        assert_eq!(vm.new_array(usize::MAX), Err(ObjectError::AllocationFailure));
        assert_eq!(vm.object_count(), 1);

        // Both spaces stay usable
        assert!(heap.new_array(2).is_ok());
        assert!(vm.new_array(2).is_ok());
    }
}
