/// Clamps the bars between two pointer positions onto existing bin indices.
///
/// Positions may lie outside the bars (negative or past the end). Returns
/// `None` when the range misses every bin.
pub fn clamp_range(start: isize, end: isize, len: usize) -> Option<(usize, usize)> {
    let len = isize::try_from(len).ok().filter(|len| *len > 0)?;
    let first = start.min(end).max(0);
    let last = start.max(end).min(len - 1);
    if first >= len || last < 0 {
        return None;
    }
    Some((first as usize, last as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2, 5, 10, Some((2, 5)))]
    #[case(5, 2, 10, Some((2, 5)))]
    #[case(-3, 1, 10, Some((0, 1)))]
    #[case(8, 40, 10, Some((8, 9)))]
    #[case(-4, -1, 10, None)]
    #[case(10, 12, 10, None)]
    #[case(0, 0, 0, None)]
    fn test_clamp_range(
        #[case] start: isize,
        #[case] end: isize,
        #[case] len: usize,
        #[case] expected: Option<(usize, usize)>,
    ) {
        assert_eq!(clamp_range(start, end, len), expected);
    }
}
