//! The `add` operator
//!
//! | kind    | result                                         |
//! |---------|------------------------------------------------|
//! | integer | wrapping sum                                   |
//! | float   | sum                                            |
//! | string  | concatenation into a new buffer                |
//! | vector3 | new vector of component-wise `add` results     |
//! | array   | new array of copied elements, left then right  |
//!
//! Mismatched kinds, including mismatches nested inside vector components,
//! are rejected before anything is allocated.

use super::object::{alloc, new_vector3};
use super::{ObjectError, ObjectSpace, array, string};
use crate::value::{Handle, ObjectData};

pub fn add<S: ObjectSpace + ?Sized>(
    space: &mut S,
    a: Handle,
    b: Handle,
) -> Result<Handle, ObjectError> {
    check_compatible(space, a, b)?;
    add_checked(space, a, b)
}

/// Kinds match all the way down through vector components
fn check_compatible<S: ObjectSpace + ?Sized>(
    space: &S,
    a: Handle,
    b: Handle,
) -> Result<(), ObjectError> {
    let left = space.object(a).ok_or(ObjectError::NullInput)?;
    let right = space.object(b).ok_or(ObjectError::NullInput)?;

    match (left.data(), right.data()) {
        (ObjectData::Integer(_), ObjectData::Integer(_))
        | (ObjectData::Float(_), ObjectData::Float(_))
        | (ObjectData::String(_), ObjectData::String(_))
        | (ObjectData::Array(_), ObjectData::Array(_)) => Ok(()),
        (
            ObjectData::Vector3 { x: ax, y: ay, z: az },
            ObjectData::Vector3 { x: bx, y: by, z: bz },
        ) => {
            check_compatible(space, *ax, *bx)?;
            check_compatible(space, *ay, *by)?;
            check_compatible(space, *az, *bz)
        }
        (l, r) => Err(ObjectError::KindMismatch {
            left: l.kind(),
            right: r.kind(),
        }),
    }
}

fn add_checked<S: ObjectSpace + ?Sized>(
    space: &mut S,
    a: Handle,
    b: Handle,
) -> Result<Handle, ObjectError> {
    let left = space.object(a).ok_or(ObjectError::NullInput)?;
    let right = space.object(b).ok_or(ObjectError::NullInput)?;

    match (left.data(), right.data()) {
        (ObjectData::Integer(x), ObjectData::Integer(y)) => {
            let sum = x.wrapping_add(*y);
            space.new_integer(sum)
        }
        (ObjectData::Float(x), ObjectData::Float(y)) => {
            let sum = x + y;
            space.new_float(sum)
        }
        (ObjectData::String(x), ObjectData::String(y)) => {
            let joined = string::concat(x, y)?;
            alloc(space, ObjectData::String(joined))
        }
        (
            ObjectData::Vector3 { x: ax, y: ay, z: az },
            ObjectData::Vector3 { x: bx, y: by, z: bz },
        ) => {
            let pairs = [(*ax, *bx), (*ay, *by), (*az, *bz)];
            add_vector3(space, pairs)
        }
        (ObjectData::Array(_), ObjectData::Array(_)) => array::concat(space, a, b),
        (l, r) => Err(ObjectError::KindMismatch {
            left: l.kind(),
            right: r.kind(),
        }),
    }
}

fn add_vector3<S: ObjectSpace + ?Sized>(
    space: &mut S,
    pairs: [(Handle, Handle); 3],
) -> Result<Handle, ObjectError> {
    let mut components: [Option<Handle>; 3] = [None; 3];
    let mut failure = None;

    for (slot, (a, b)) in components.iter_mut().zip(pairs) {
        match add_checked(space, a, b) {
            Ok(sum) => *slot = Some(sum),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let result = match (failure, components) {
        (None, [Some(x), Some(y), Some(z)]) => new_vector3(space, x, y, z),
        (failure, _) => Err(failure.unwrap_or(ObjectError::NullInput)),
    };

    // The vector holds its own references now; drop the ones `add` handed us
    for component in components.into_iter().flatten() {
        space.release(component);
    }
    result
}
