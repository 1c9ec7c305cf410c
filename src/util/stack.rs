//! Growable LIFO stack
//!
//! One generic container backs the VM call stack, every frame's root set,
//! the object registry and the arena slot table. Capacity doubles when a
//! push finds the stack full; growth failure is reported instead of aborting.

use std::fmt;

/// Backing storage could not be grown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocation failure")
    }
}

impl std::error::Error for AllocError {}

/// Stack with explicit, doubling capacity
pub struct GrowableStack<T> {
    /// Live entries, bottom first
    items: Vec<T>,
    /// Logical capacity; only changes by doubling
    capacity: usize,
}

impl<T> GrowableStack<T> {
    /// Create a stack able to hold `capacity` entries before growing.
    /// Aborts on allocation failure, like `Vec::with_capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        GrowableStack {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Fallible [`GrowableStack::with_capacity`]
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity).map_err(|_| AllocError)?;
        Ok(GrowableStack { items, capacity })
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the stack is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push an entry, doubling capacity first if the stack is full
    pub fn push(&mut self, item: T) -> Result<(), AllocError> {
        if self.items.len() == self.capacity {
            self.grow()?;
        }
        self.items.push(item);
        Ok(())
    }

    /// Push an entry and return a reference to it
    pub fn push_mut(&mut self, item: T) -> Result<&mut T, AllocError> {
        let index = self.items.len();
        self.push(item)?;
        Ok(&mut self.items[index])
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        let new_capacity = match self.capacity {
            0 => 1,
            n => n.checked_mul(2).ok_or(AllocError)?,
        };
        self.items
            .try_reserve_exact(new_capacity - self.items.len())
            .map_err(|_| AllocError)?;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Remove and return the top entry
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Peek at the top entry
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Entry at `index`, counted from the bottom
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Iterate bottom to top
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Keep only the entries matching `keep`, preserving order.
    /// Capacity is left untouched.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    /// Drop every entry, keeping capacity
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for GrowableStack<T> {
    fn default() -> Self {
        GrowableStack {
            items: Vec::new(),
            capacity: 0,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableStack")
            .field("count", &self.items.len())
            .field("capacity", &self.capacity)
            .field("items", &self.items)
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a GrowableStack<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stack: GrowableStack<u32> = GrowableStack::try_with_capacity(4).unwrap();
        assert_eq!(stack.len(), 0);
        assert_eq!(stack.capacity(), 4);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_try_with_capacity_overflow() {
        let result: Result<GrowableStack<u64>, _> = GrowableStack::try_with_capacity(usize::MAX);
        assert_eq!(result.err(), Some(AllocError));
    }

    #[test]
    fn test_push_pop() {
        let mut stack = GrowableStack::with_capacity(2);

        stack.push(1).unwrap();
        stack.push(2).unwrap();

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_doubles_on_overflow() {
        let mut stack = GrowableStack::with_capacity(1);

        stack.push("a").unwrap();
        assert_eq!(stack.capacity(), 1);
        stack.push("b").unwrap();
        assert_eq!(stack.capacity(), 2);
        stack.push("c").unwrap();
        assert_eq!(stack.capacity(), 4);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_push_mut_returns_new_top() {
        let mut stack = GrowableStack::with_capacity(1);
        stack.push(1).unwrap();

        *stack.push_mut(2).unwrap() += 40;
        assert_eq!(stack.as_slice(), &[1, 42]);
        assert_eq!(stack.capacity(), 2);
    }

    #[test]
    fn test_zero_capacity_grows() {
        let mut stack = GrowableStack::with_capacity(0);
        stack.push(7).unwrap();
        assert_eq!(stack.capacity(), 1);
        assert_eq!(stack.peek(), Some(&7));
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut stack: GrowableStack<u8> = GrowableStack::default();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.peek(), None);
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn test_retain_keeps_capacity() {
        let mut stack = GrowableStack::with_capacity(8);
        for i in 0..6 {
            stack.push(i).unwrap();
        }

        stack.retain(|&i| i % 2 == 0);

        assert_eq!(stack.as_slice(), &[0, 2, 4]);
        assert_eq!(stack.capacity(), 8);
    }

    #[test]
    fn test_get() {
        let mut stack = GrowableStack::with_capacity(2);
        stack.push(10).unwrap();
        stack.push(20).unwrap();

        assert_eq!(stack.get(0), Some(&10));
        assert_eq!(stack.get(1), Some(&20));
        assert_eq!(stack.get(2), None);

        *stack.get_mut(0).unwrap() = 11;
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![11, 20]);
    }
}
