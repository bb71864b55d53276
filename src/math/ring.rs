/// Wrap-aware index arithmetic over a closed sequence of `len` elements.
///
/// Every track array is circular: index `len` is index `0`. All offsets go
/// through this type instead of ad-hoc `(i + n) % n` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    len: usize,
}

impl Ring {
    /// Creates a ring over `len` elements.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Number of elements in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a ring with no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wraps an arbitrary index into `[0, len)`. Returns `0` on an empty ring.
    #[must_use]
    pub fn wrap(&self, index: usize) -> usize {
        if self.len == 0 {
            0
        } else {
            index % self.len
        }
    }

    /// `index + delta`, wrapped. `delta` may be negative.
    #[must_use]
    pub fn offset(&self, index: usize, delta: isize) -> usize {
        if self.len == 0 {
            return 0;
        }
        let step = delta.unsigned_abs() % self.len;
        let index = index % self.len;
        if delta >= 0 {
            (index + step) % self.len
        } else {
            (index + self.len - step) % self.len
        }
    }

    /// Index after `index`.
    #[must_use]
    pub fn next(&self, index: usize) -> usize {
        self.offset(index, 1)
    }

    /// Index before `index`.
    #[must_use]
    pub fn prev(&self, index: usize) -> usize {
        self.offset(index, -1)
    }

    /// Steps needed to walk forward from `from` to `to`.
    #[must_use]
    pub fn forward_distance(&self, from: usize, to: usize) -> usize {
        if self.len == 0 {
            return 0;
        }
        (self.wrap(to) + self.len - self.wrap(from)) % self.len
    }

    /// Shortest number of steps between two indices in either direction.
    #[must_use]
    pub fn distance(&self, a: usize, b: usize) -> usize {
        let forward = self.forward_distance(a, b);
        forward.min(self.len - forward)
    }

    /// Iterates `count` indices starting at `start`, wrapping past the end.
    pub fn span(&self, start: usize, count: usize) -> impl Iterator<Item = usize> + '_ {
        (0..count).map(move |k| self.wrap(start + k))
    }
}

/// Rotates `items` left so that `items[start]` becomes element `0`.
pub fn rotate_to<T>(items: &mut [T], start: usize) {
    if items.is_empty() {
        return;
    }
    let start = start % items.len();
    items.rotate_left(start);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_and_offset() {
        let ring = Ring::new(10);
        assert_eq!(ring.wrap(13), 3);
        assert_eq!(ring.offset(0, -1), 9);
        assert_eq!(ring.offset(9, 1), 0);
        assert_eq!(ring.offset(2, -25), 7);
        assert_eq!(ring.offset(2, 25), 7);
        assert_eq!(ring.next(9), 0);
        assert_eq!(ring.prev(0), 9);
    }

    #[test]
    fn distances_wrap() {
        let ring = Ring::new(100);
        assert_eq!(ring.forward_distance(95, 5), 10);
        assert_eq!(ring.forward_distance(5, 95), 90);
        assert_eq!(ring.distance(5, 95), 10);
        assert_eq!(ring.distance(10, 60), 50);
    }

    #[test]
    fn span_crosses_seam() {
        let ring = Ring::new(5);
        let idx: Vec<usize> = ring.span(3, 4).collect();
        assert_eq!(idx, vec![3, 4, 0, 1]);
    }

    #[test]
    fn empty_ring_is_safe() {
        let ring = Ring::new(0);
        assert!(ring.is_empty());
        assert_eq!(ring.wrap(7), 0);
        assert_eq!(ring.offset(3, -4), 0);
        assert_eq!(ring.distance(1, 2), 0);
    }

    #[test]
    fn rotate_to_start() {
        let mut v = vec![0, 1, 2, 3, 4];
        rotate_to(&mut v, 3);
        assert_eq!(v, vec![3, 4, 0, 1, 2]);
    }
}
