//! Lazy, single-pass entity sequences.

use labkit_model::Entity;

/// A pull-based, single-consumption sequence of entities.
///
/// Streams are consumed by move: once handed to a repository (or drained via
/// the [`Iterator`] impl) they cannot be re-iterated — the type system
/// enforces the single-pass contract. Decorators that intercept a stream must
/// use [`EntityStream::inspect`], which replays elements in the original
/// order without materializing them.
pub struct EntityStream {
    inner: Box<dyn Iterator<Item = Entity> + Send>,
}

impl EntityStream {
    /// Wraps any iterator of entities.
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Entity>,
        I::IntoIter: Send + 'static,
    {
        Self {
            inner: Box::new(iter.into_iter()),
        }
    }

    /// An empty stream.
    pub fn empty() -> Self {
        Self::from_iter(std::iter::empty())
    }

    /// Applies a per-element side effect as the stream is consumed.
    ///
    /// Order and single consumption are preserved; the effect runs exactly
    /// once per element, at the moment the inner consumer pulls it.
    pub fn inspect<F>(self, mut f: F) -> Self
    where
        F: FnMut(&Entity) + Send + 'static,
    {
        Self {
            inner: Box::new(self.inner.map(move |entity| {
                f(&entity);
                entity
            })),
        }
    }

    /// Transforms each element as the stream is consumed.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnMut(Entity) -> Entity + Send + 'static,
    {
        Self {
            inner: Box::new(self.inner.map(f)),
        }
    }
}

impl Iterator for EntityStream {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        self.inner.next()
    }
}

impl From<Vec<Entity>> for EntityStream {
    fn from(entities: Vec<Entity>) -> Self {
        Self::from_iter(entities)
    }
}
