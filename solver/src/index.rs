use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::ops::{Deref, Index, IndexMut};

/// Per-vertex table: a `Vec` that can only be indexed with `I`.
#[derive(Clone, PartialEq, Eq)]
pub struct IndexedVec<I, T> {
    vec: Vec<T>,
    _marker: PhantomData<I>,
}

impl<I, T> IndexedVec<I, T> {
    fn from_vec(vec: Vec<T>) -> Self {
        Self { vec, _marker: PhantomData }
    }
}

impl<I: AsIndex, T> IndexedVec<I, T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// One copy of `value` for each of the first `len` indexes.
    pub fn repeat(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        Self::from_vec(vec![value; len])
    }

    pub fn push(&mut self, value: T) -> I {
        let index = I::from_usize(self.vec.len());
        self.vec.push(value);
        index
    }

    pub fn indexes(&self) -> impl DoubleEndedIterator<Item = I> + ExactSizeIterator {
        (0..self.vec.len()).map(I::from_usize)
    }

    pub fn enumerate(&self) -> impl DoubleEndedIterator<Item = (I, &T)> + ExactSizeIterator {
        self.indexes().zip(&self.vec)
    }
}

// Read-only slice access; growing goes through `push` so indexes stay in sync.
impl<I, T> Deref for IndexedVec<I, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.vec
    }
}

impl<I: AsIndex, T> Default for IndexedVec<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: AsIndex, T> Index<I> for IndexedVec<I, T> {
    type Output = T;

    fn index(&self, index: I) -> &T {
        &self.vec[index.to_usize()]
    }
}

impl<I: AsIndex, T> IndexMut<I> for IndexedVec<I, T> {
    fn index_mut(&mut self, index: I) -> &mut T {
        &mut self.vec[index.to_usize()]
    }
}

impl<I, T> FromIterator<T> for IndexedVec<I, T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<I, T: fmt::Debug> fmt::Debug for IndexedVec<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.vec, f)
    }
}

pub trait AsIndex: Copy {
    fn to_usize(&self) -> usize;
    fn from_usize(index: usize) -> Self;
}

/// `usize` without `usize::MAX`, so that `Option` of an index is no bigger than the index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonMaxUsize(NonZeroUsize);

impl NonMaxUsize {
    pub const fn new(n: usize) -> Self {
        match NonZeroUsize::new(n.wrapping_add(1)) {
            Some(n) => Self(n),
            None => panic!("index out of range"),
        }
    }

    pub const fn get(self) -> usize {
        self.0.get() - 1
    }
}

impl fmt::Debug for NonMaxUsize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Declares a typed index together with a constructor function of the same name.
macro_rules! new_index {
    ($(#[$meta:meta])* $vis:vis index $ty:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $ty {
            index: $crate::index::NonMaxUsize,
        }

        #[allow(non_snake_case)]
        $vis const fn $ty(index: usize) -> $ty {
            $ty { index: $crate::index::NonMaxUsize::new(index) }
        }

        impl $crate::index::AsIndex for $ty {
            fn to_usize(&self) -> usize {
                self.index.get()
            }

            fn from_usize(index: usize) -> Self {
                $ty(index)
            }
        }
    };
}
pub(crate) use new_index;
