use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::OrdoSkipListError;
use crate::skip_list::SkipList;
use crate::Result;

/// Splits a dump record into its key and value substrings.
///
/// A record line must contain exactly one `:` separator with a non-empty key
/// before it and a non-empty value after it; anything else is a
/// `MalformedRecord`.
pub fn parse_record(line: &str) -> Result<(&str, &str)> {
    let sep = line.find(':').ok_or_else(|| {
        OrdoSkipListError::MalformedRecord("missing ':' separator".into())
    })?;
    let (key, value) = (&line[..sep], &line[sep + 1..]);
    if value.contains(':') {
        return Err(OrdoSkipListError::MalformedRecord(
            "more than one ':' separator".into(),
        ));
    }
    if key.is_empty() {
        return Err(OrdoSkipListError::MalformedRecord("empty key".into()));
    }
    if value.is_empty() {
        return Err(OrdoSkipListError::MalformedRecord("empty value".into()));
    }
    Ok((key, value))
}

fn malformed(line_no: usize, reason: impl Display) -> OrdoSkipListError {
    OrdoSkipListError::MalformedRecord(format!("line {line_no}: {reason}"))
}

impl<K: Display, V: Display> SkipList<K, V> {
    /// Writes the ascending sequence as `key:value` lines.
    ///
    /// The lock is held for the whole walk, so the dump is one consistent
    /// snapshot.
    pub fn dump_to<W: Write>(&self, mut w: W) -> Result<()> {
        let inner = self.inner.lock();
        let mut cur = inner.first();
        while let Some(idx) = cur {
            let node = inner.node(idx);
            writeln!(w, "{}:{}", node.key(), node.value())?;
            cur = inner.next_at(idx, 0);
        }
        w.flush()?;
        Ok(())
    }

    pub fn dump_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.dump_to(BufWriter::new(File::create(path)?))
    }
}

impl<K: FromStr, V: FromStr> SkipList<K, V> {
    /// Reads `key:value` lines back into the list and returns how many were
    /// inserted. Empty lines are skipped; a duplicate key keeps the earlier
    /// record. A malformed line stops the load with `MalformedRecord`, and
    /// every record loaded before it stays in the list.
    pub fn load_from<R: BufRead>(&self, reader: R) -> Result<usize> {
        let mut loaded = 0;
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let line_no = n + 1;
            let (key, value) = parse_record(&line).map_err(|e| match e {
                OrdoSkipListError::MalformedRecord(reason) => {
                    malformed(line_no, reason)
                }
                other => other,
            })?;
            let key = key
                .parse::<K>()
                .map_err(|_| malformed(line_no, "unparsable key"))?;
            let value = value
                .parse::<V>()
                .map_err(|_| malformed(line_no, "unparsable value"))?;
            match self.try_insert(key, value) {
                Ok(()) => loaded += 1,
                Err(OrdoSkipListError::KeyAlreadyExists) => {
                    debug!("duplicate key at line {line_no}, keeping first");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(loaded)
    }

    pub fn load_from_path<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        self.load_from(BufReader::new(File::open(path)?))
    }
}
