// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Natural ("human") ordering of path strings: `a2` sorts before `a10`.

use std::cmp::Ordering;

/// A run of digits or of non-digits
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Text(&'a str),
    Number(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != digit => {
                out.push(chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(digit) = in_digits {
        out.push(chunk(&s[start..], digit));
    }
    out
}

fn chunk(text: &str, digit: bool) -> Chunk<'_> {
    if digit {
        Chunk::Number(text)
    } else {
        Chunk::Text(text)
    }
}

/// Compare digit runs by value without overflowing on long runs
fn cmp_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural ordering; digit runs compare numerically
///
/// Strings that only differ in leading zeros fall back to plain ordering so
/// the result is a total order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ca = chunks(a);
    let cb = chunks(b);

    for (x, y) in ca.iter().zip(&cb) {
        let ord = match (x, y) {
            (Chunk::Number(x), Chunk::Number(y)) => cmp_numbers(x, y),
            // A number sorts before text, as in mixed int/str keys
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    ca.len().cmp(&cb.len()).then_with(|| a.cmp(b))
}

/// Sort in place using [`natural_cmp`]
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_sort_example() {
        let mut items = vec!["a10", "a2", "a1"];
        natural_sort(&mut items);
        assert_eq!(items, vec!["a1", "a2", "a10"]);
    }

    #[test]
    fn test_natural_sort_paths() {
        let mut items = vec![
            "/data/r10i1p1/file.nc",
            "/data/r2i1p1/file.nc",
            "/data/r1i10p1/file.nc",
            "/data/r1i2p1/file.nc",
        ];
        natural_sort(&mut items);
        assert_eq!(
            items,
            vec![
                "/data/r1i2p1/file.nc",
                "/data/r1i10p1/file.nc",
                "/data/r2i1p1/file.nc",
                "/data/r10i1p1/file.nc",
            ]
        );
    }

    #[test]
    fn test_long_digit_runs() {
        assert_eq!(
            natural_cmp("x99999999999999999999999", "x100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_leading_zeros_total_order() {
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("a1", "a01"), Ordering::Greater);
        assert_eq!(natural_cmp("a1", "a1"), Ordering::Equal);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("file", "file1"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }
}
