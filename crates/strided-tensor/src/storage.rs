//! Arc-based storage for dense tensor buffers.
//!
//! Clones and reshapes share one reference-counted buffer. The first write
//! through a shared handle copies the buffer, so every handle observes the values
//! it wrote and nothing else.

use std::sync::Arc;

/// A reference-counted contiguous buffer of elements.
///
/// # Thread Safety
///
/// `TensorStorage` is `Send + Sync` when `T: Send + Sync`. Shared handles are
/// read-only until written, at which point the writer detaches.
pub struct TensorStorage<T> {
    inner: Arc<Vec<T>>,
}

impl<T> TensorStorage<T> {
    /// Creates a new storage taking ownership of a vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Returns the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the buffer holds no element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the buffer as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Returns the pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.inner.as_ptr()
    }

    /// Returns true if no other handle shares this buffer.
    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Returns true if both handles point at the same buffer.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> TensorStorage<T> {
    /// Returns the buffer as a mutable slice, copying it first if it is shared.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if !self.is_unique() {
            log::trace!("detaching shared buffer of {} elements", self.len());
        }
        Arc::make_mut(&mut self.inner).as_mut_slice()
    }

    /// Consumes the storage and returns the data as a vector.
    ///
    /// The buffer is moved out when unique and cloned when shared.
    pub fn into_vec(self) -> Vec<T> {
        Arc::try_unwrap(self.inner).unwrap_or_else(|shared| shared.as_ref().clone())
    }
}

impl<T> Clone for TensorStorage<T> {
    /// Creates a cheap clone by incrementing the reference count.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for TensorStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorStorage")
            .field("ptr", &self.as_ptr())
            .field("len", &self.len())
            .field("is_unique", &self.is_unique())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_from_vec() {
        let storage = TensorStorage::from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(storage.as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(storage.len(), 5);
        assert!(!storage.is_empty());
        assert!(storage.is_unique());
    }

    #[test]
    fn test_storage_cheap_clone() {
        let storage1 = TensorStorage::from_vec(vec![1, 2, 3]);
        let storage2 = storage1.clone();
        assert!(storage1.ptr_eq(&storage2));
        assert!(!storage1.is_unique());
        assert!(std::ptr::eq(storage1.as_ptr(), storage2.as_ptr()));
    }

    #[test]
    fn test_storage_copy_on_write() {
        let storage1 = TensorStorage::from_vec(vec![1, 2, 3]);
        let mut storage2 = storage1.clone();
        storage2.as_mut_slice()[0] = 10;
        assert_eq!(storage1.as_slice(), &[1, 2, 3]);
        assert_eq!(storage2.as_slice(), &[10, 2, 3]);
        assert!(!storage1.ptr_eq(&storage2));
        assert!(storage1.is_unique());
    }

    #[test]
    fn test_storage_unique_mutation_in_place() {
        let mut storage = TensorStorage::from_vec(vec![1, 2, 3]);
        let ptr = storage.as_ptr();
        storage.as_mut_slice()[2] = 30;
        assert!(std::ptr::eq(ptr, storage.as_ptr()));
        assert_eq!(storage.into_vec(), vec![1, 2, 30]);
    }

    #[test]
    fn test_storage_into_vec_shared() {
        let storage1 = TensorStorage::from_vec(vec![4, 5]);
        let storage2 = storage1.clone();
        assert_eq!(storage1.into_vec(), vec![4, 5]);
        assert_eq!(storage2.as_slice(), &[4, 5]);
    }
}
