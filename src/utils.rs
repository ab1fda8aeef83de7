/// Advances a physical slot index by `addend`, wrapping at `capacity`.
#[inline]
pub fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(index < capacity);
    debug_assert!(addend <= capacity);
    (index + addend) % capacity
}

#[cfg(test)]
mod tests {
    use super::wrap_add;

    #[test]
    fn wraps_past_the_end() {
        assert_eq!(wrap_add(0, 0, 1), 0);
        assert_eq!(wrap_add(0, 1, 1), 0);
        assert_eq!(wrap_add(1, 1, 3), 2);
        assert_eq!(wrap_add(2, 1, 3), 0);
        assert_eq!(wrap_add(2, 3, 3), 2);
        assert_eq!(wrap_add(1, 2, 3), 0);
    }
}
