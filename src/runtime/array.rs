//! Snek Array implementation
//!
//! Arrays have a fixed number of slots chosen at construction. A slot is
//! either empty or holds a handle to a child; writes replace the handle,
//! never the child object.

use super::object::{new_array, shallow_copy};
use super::{ObjectError, ObjectSpace};
use crate::value::{Handle, ObjectData};

/// Element at `index`; `None` if out of bounds, empty, or not an array
pub fn get<S: ObjectSpace + ?Sized>(space: &S, array: Handle, index: usize) -> Option<Handle> {
    space.object(array)?.as_array()?.get(index).copied().flatten()
}

/// Store `value` at `index`.
///
/// The new occupant is retained before the previous one is released, so
/// storing the handle a slot already holds is safe and a release that frees
/// the old occupant cannot free `value`.
pub fn set<S: ObjectSpace + ?Sized>(
    space: &mut S,
    array: Handle,
    index: usize,
    value: Handle,
) -> Result<(), ObjectError> {
    if !space.arena().contains(value) {
        return Err(ObjectError::NullInput);
    }
    let len = space
        .object(array)
        .and_then(|o| o.as_array())
        .map(|slots| slots.len())
        .ok_or(ObjectError::NullInput)?;
    if index >= len {
        return Err(ObjectError::InvalidIndex { index, len });
    }

    space.retain(value);
    let previous = replace_slot(space, array, index, Some(value));
    if let Some(previous) = previous {
        space.release(previous);
    }
    Ok(())
}

/// Write a slot directly, without touching any referencing-site counts
fn replace_slot<S: ObjectSpace + ?Sized>(
    space: &mut S,
    array: Handle,
    index: usize,
    value: Option<Handle>,
) -> Option<Handle> {
    match space.arena_mut().get_mut(array).map(|o| o.data_mut()) {
        Some(ObjectData::Array(slots)) => slots
            .get_mut(index)
            .and_then(|slot| std::mem::replace(slot, value)),
        _ => None,
    }
}

/// New array of `len(a) + len(b)` slots: a's elements, then b's.
///
/// Every element is a fresh shallow copy, so the result shares no slot
/// occupants with its operands. Empty slots stay empty.
pub fn concat<S: ObjectSpace + ?Sized>(
    space: &mut S,
    a: Handle,
    b: Handle,
) -> Result<Handle, ObjectError> {
    let len_a = space.length(a).ok_or(ObjectError::NullInput)?;
    let len_b = space.length(b).ok_or(ObjectError::NullInput)?;
    let total = len_a.checked_add(len_b).ok_or(ObjectError::AllocationFailure)?;

    let result = new_array(space, total)?;
    for i in 0..total {
        let element = if i < len_a {
            get(space, a, i)
        } else {
            get(space, b, i - len_a)
        };
        let Some(element) = element else {
            continue;
        };

        match shallow_copy(space, element) {
            // The copy's initial reference is the slot itself
            Ok(copy) => {
                replace_slot(space, result, i, Some(copy));
            }
            Err(err) => {
                space.release(result);
                return Err(err);
            }
        }
    }
    Ok(result)
}
