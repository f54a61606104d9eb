//! Occurrence counting over newline-delimited input.

use crate::error::TallyError;
use crate::map::StrIntMap;
use std::io::{self, BufRead, Write};

/// Counts each input line in `map` until end of input or the first empty
/// line. Returns the number of lines counted.
pub fn tally<M, R>(map: &mut M, mut input: R) -> Result<usize, TallyError>
where
    M: StrIntMap,
    R: BufRead,
{
    let mut line = String::new();
    let mut counted = 0usize;
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let name = line.trim_end_matches(&['\n', '\r'][..]);
        if name.is_empty() {
            break;
        }
        increment(map, name)?;
        counted += 1;
    }
    Ok(counted)
}

/// Adds one to the count for `key`, starting at 1.
pub fn increment<M: StrIntMap>(map: &mut M, key: &str) -> Result<i32, TallyError> {
    let next = match map.get(key) {
        Some(n) => n.saturating_add(1),
        None => 1,
    };
    map.put(key, next)?;
    Ok(next)
}

/// Writes `"<key> = <value>"` for every entry, stopping at the first write
/// error.
pub fn write_counts<M, W>(map: &M, out: &mut W) -> io::Result<()>
where
    M: StrIntMap,
    W: Write,
{
    let mut result = Ok(());
    map.for_each(|k, v| {
        if result.is_ok() {
            result = writeln!(out, "{k} = {v}");
        }
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayMap, ChainedMap};
    use std::io::Cursor;
    use test_log::test;

    #[test]
    fn stops_at_empty_line() {
        let mut m = ChainedMap::new();
        let n = tally(&mut m, Cursor::new("trek\ngiant\n\ntrek\n")).unwrap();
        assert_eq!(n, 2);
        assert_eq!(m.get("trek"), Some(1));
        assert_eq!(m.get("giant"), Some(1));
    }

    #[test]
    fn handles_crlf_and_missing_final_newline() {
        let mut m = ArrayMap::new();
        let n = tally(&mut m, Cursor::new("trek\r\ntrek\r\ngiant")).unwrap();
        assert_eq!(n, 3);
        assert_eq!(m.get("trek"), Some(2));
        assert_eq!(m.get("giant"), Some(1));
    }

    #[test]
    fn increment_starts_at_one() {
        let mut m = ArrayMap::new();
        assert_eq!(increment(&mut m, "trek").unwrap(), 1);
        assert_eq!(increment(&mut m, "trek").unwrap(), 2);
    }

    #[test]
    fn write_counts_formats_lines() {
        let mut m = ChainedMap::new();
        m.put("trek", 3).unwrap();
        let mut out = Vec::new();
        write_counts(&m, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "trek = 3\n");
    }

    #[test]
    fn write_counts_reports_first_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut m = ArrayMap::new();
        m.put("a", 1).unwrap();
        m.put("b", 2).unwrap();
        let err = write_counts(&m, &mut Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
