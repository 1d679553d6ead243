//! Column transposition keyed by the sorted order of the layer key

const PAD: u8 = b' ';

/// Column indices of `key` sorted by character code, ties in original order
fn column_order(key: &str) -> Vec<usize> {
    let mut columns: Vec<(char, usize)> = key.chars().zip(0..).collect();
    // sort_by_key is stable
    columns.sort_by_key(|&(c, _)| c);
    columns.into_iter().map(|(_, index)| index).collect()
}

/// Undo the transposition layer.
///
/// The text fills the grid one column at a time in key order, top to
/// bottom, and the grid is read back row by row. When the text does not fill
/// the grid the remaining cells stay as spaces, so the output is
/// `columns * ceil(len / columns)` bytes long.
pub fn decode(text: &[u8], key: &str) -> Vec<u8> {
    let columns = key.chars().count();
    if columns == 0 || text.is_empty() {
        return text.to_vec();
    }
    let rows = text.len().div_ceil(columns);

    let mut grid = vec![PAD; rows * columns];
    let mut source = text.iter();
    for column in column_order(key) {
        for row in 0..rows {
            match source.next() {
                Some(&byte) => grid[row * columns + column] = byte,
                None => return grid,
            }
        }
    }
    grid
}

/// Inverse of [`decode`] for full grids.
///
/// The text is padded with spaces to a whole number of rows first, so the
/// output of `decode(encode(text))` is `text` followed by that padding.
pub fn encode(text: &[u8], key: &str) -> Vec<u8> {
    let columns = key.chars().count();
    if columns == 0 || text.is_empty() {
        return text.to_vec();
    }
    let rows = text.len().div_ceil(columns);

    let mut grid = text.to_vec();
    grid.resize(rows * columns, PAD);

    let mut output = Vec::with_capacity(grid.len());
    for column in column_order(key) {
        output.extend((0..rows).map(|row| grid[row * columns + column]));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_order_is_stable() {
        assert_eq!(column_order("bca"), vec![2, 0, 1]);
        assert_eq!(column_order("abab"), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_full_grid() {
        assert_eq!(decode(b"abcd", "ba"), b"cadb");
    }

    #[test]
    fn test_partial_grid_keeps_padding() {
        // column 2 gets "abc", column 0 "def", column 1 only "gh"
        assert_eq!(decode(b"abcdefgh", "bca"), b"dgaehbf c");
    }

    #[test]
    fn test_short_text() {
        // "key" sorts as e, k, y so the lone byte lands in column 1
        assert_eq!(decode(b"x", "key"), b" x ");
    }

    #[test]
    fn test_empty_text() {
        assert!(decode(b"", "key").is_empty());
        assert!(encode(b"", "key").is_empty());
    }

    proptest! {
        #[test]
        fn test_length_invariant(text in proptest::collection::vec(any::<u8>(), 0..512), key in "[ -~]{1,130}") {
            let columns = key.len();
            let output = decode(&text, &key);
            prop_assert_eq!(output.len(), columns * text.len().div_ceil(columns));
            prop_assert!(output.len() >= text.len());
        }

        #[test]
        fn test_no_character_dropped(text in "[a-z]{0,300}", key in "[ -~]{1,64}") {
            let output = decode(text.as_bytes(), &key);
            let mut expected: Vec<u8> = text.bytes().collect();
            let mut actual: Vec<u8> = output.into_iter().filter(|&b| b != PAD).collect();
            expected.sort_unstable();
            actual.sort_unstable();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn test_encode_inverts_decode(text in proptest::collection::vec(any::<u8>(), 1..512), key in "[ -~]{1,130}") {
            let decoded = decode(&encode(&text, &key), &key);
            prop_assert_eq!(&decoded[..text.len()], &text[..]);
            prop_assert!(decoded[text.len()..].iter().all(|&b| b == PAD));
        }
    }
}
