//! Parser for the NFSv3 procedure record of `/proc/net/rpc/nfs`.
//!
//! The kernel prints one line per RPC program version, for example:
//!
//! ```text
//! net 0 0 0 0
//! rpc 1377 0 1377
//! proc3 22 1100 3 215 90 0 2201 57 12 3 0 0 9 1 4 0 6 40 2 1 0 8 0
//! proc4 69 0 12 0 ...
//! ```
//!
//! Position 0 of the `proc3` record is a leading total field that maps to no operation.
//! Positions 1 through 21 carry the cumulative counters of [`Nfs3Procedure::ALL`], in that order.
//! Only the first `proc3` line is used and every other line is ignored.
//!
//! # Example
//!
//! ```rust
//! use nfsstat_monitor::nfs::{Nfs3OpCounts, Nfs3Procedure};
//!
//! let data = "\
//! proc2 18 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
//! proc3 22 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21
//! ";
//! let counts = Nfs3OpCounts::from_reader(&mut data.as_bytes()).unwrap().unwrap();
//!
//! assert_eq!(counts.get(Nfs3Procedure::Getattr), Some(1));
//! assert_eq!(counts.get(Nfs3Procedure::Commit), Some(21));
//! ```

use std::fmt;
use std::io::BufRead;

use super::{Nfs3Procedure, ParseError, Snapshot};

/// First token of the NFSv3 procedure record.
pub const RECORD_TAG: &str = "proc3";

/// Fewest positions a `proc3` record may carry: the leading field plus 20 counters.
pub const MIN_POSITIONS: usize = 21;

/// Cumulative per-operation call counts of the NFSv3 client since boot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Nfs3OpCounts {
    pub getattr: u64,
    pub setattr: u64,
    pub lookup: u64,
    pub access: u64,
    pub readlink: u64,
    pub read: u64,
    pub write: u64,
    pub create: u64,
    pub mkdir: u64,
    pub symlink: u64,
    pub mknod: u64,
    pub remove: u64,
    pub rmdir: u64,
    pub rename: u64,
    pub link: u64,
    pub readdir: u64,
    pub readdirplus: u64,
    pub fsstat: u64,
    pub fsinfo: u64,
    pub pathconf: u64,
    /// `None` for a record that ends after `pathconf`.
    pub commit: Option<u64>,
}

impl Nfs3OpCounts {
    /// Returns the counter of the given operation, or `None` if the record did not carry it.
    pub fn get(&self, procedure: Nfs3Procedure) -> Option<u64> {
        let value = match procedure {
            Nfs3Procedure::Getattr => self.getattr,
            Nfs3Procedure::Setattr => self.setattr,
            Nfs3Procedure::Lookup => self.lookup,
            Nfs3Procedure::Access => self.access,
            Nfs3Procedure::Readlink => self.readlink,
            Nfs3Procedure::Read => self.read,
            Nfs3Procedure::Write => self.write,
            Nfs3Procedure::Create => self.create,
            Nfs3Procedure::Mkdir => self.mkdir,
            Nfs3Procedure::Symlink => self.symlink,
            Nfs3Procedure::Mknod => self.mknod,
            Nfs3Procedure::Remove => self.remove,
            Nfs3Procedure::Rmdir => self.rmdir,
            Nfs3Procedure::Rename => self.rename,
            Nfs3Procedure::Link => self.link,
            Nfs3Procedure::Readdir => self.readdir,
            Nfs3Procedure::Readdirplus => self.readdirplus,
            Nfs3Procedure::Fsstat => self.fsstat,
            Nfs3Procedure::Fsinfo => self.fsinfo,
            Nfs3Procedure::Pathconf => self.pathconf,
            Nfs3Procedure::Commit => return self.commit,
        };
        Some(value)
    }

    fn set(&mut self, procedure: Nfs3Procedure, value: u64) {
        let field = match procedure {
            Nfs3Procedure::Getattr => &mut self.getattr,
            Nfs3Procedure::Setattr => &mut self.setattr,
            Nfs3Procedure::Lookup => &mut self.lookup,
            Nfs3Procedure::Access => &mut self.access,
            Nfs3Procedure::Readlink => &mut self.readlink,
            Nfs3Procedure::Read => &mut self.read,
            Nfs3Procedure::Write => &mut self.write,
            Nfs3Procedure::Create => &mut self.create,
            Nfs3Procedure::Mkdir => &mut self.mkdir,
            Nfs3Procedure::Symlink => &mut self.symlink,
            Nfs3Procedure::Mknod => &mut self.mknod,
            Nfs3Procedure::Remove => &mut self.remove,
            Nfs3Procedure::Rmdir => &mut self.rmdir,
            Nfs3Procedure::Rename => &mut self.rename,
            Nfs3Procedure::Link => &mut self.link,
            Nfs3Procedure::Readdir => &mut self.readdir,
            Nfs3Procedure::Readdirplus => &mut self.readdirplus,
            Nfs3Procedure::Fsstat => &mut self.fsstat,
            Nfs3Procedure::Fsinfo => &mut self.fsinfo,
            Nfs3Procedure::Pathconf => &mut self.pathconf,
            Nfs3Procedure::Commit => {
                self.commit = Some(value);
                return;
            }
        };
        *field = value;
    }

    /// Parses the first `proc3` record found in `buf`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the input has no `proc3` record or the record carries no values, which is
    /// what the kernel reports when no NFSv3 mount is active.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidValue`] if a position is not a base-10 unsigned integer.
    /// - [`ParseError::TooFewPositions`] if the record has fewer than [`MIN_POSITIONS`].
    /// - [`ParseError::Io`] if reading from `buf` fails.
    pub fn from_reader<R: BufRead>(buf: &mut R) -> Result<Option<Self>, ParseError> {
        let mut line = String::new();
        let mut lineno = 0;

        while buf.read_line(&mut line)? != 0 {
            lineno += 1;
            let mut fields = line.split_whitespace();
            if fields.next() == Some(RECORD_TAG) {
                return Self::parse_record(fields, lineno);
            }

            line.clear();
        }

        Ok(None)
    }

    /// Parses the positions following the `proc3` tag.
    fn parse_record<'a>(
        fields: impl Iterator<Item = &'a str>,
        lineno: usize,
    ) -> Result<Option<Self>, ParseError> {
        let mut counts = Self::default();
        let mut positions = 0;

        for (position, raw) in fields.enumerate() {
            let value = raw
                .parse::<u64>()
                .map_err(|source| ParseError::InvalidValue {
                    value: raw.to_string(),
                    position,
                    line: lineno,
                    source,
                })?;
            // Position 0 is the leading total field.
            if let Some(procedure) = position
                .checked_sub(1)
                .and_then(|index| Nfs3Procedure::ALL.get(index))
            {
                counts.set(*procedure, value);
            }
            positions += 1;
        }

        match positions {
            0 => Ok(None),
            n if n < MIN_POSITIONS => Err(ParseError::TooFewPositions {
                actual: n,
                expected: MIN_POSITIONS,
                line: lineno,
            }),
            _ => Ok(Some(counts)),
        }
    }
}

impl fmt::Display for Nfs3OpCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for procedure in Nfs3Procedure::ALL {
            let Some(value) = self.get(procedure) else {
                continue;
            };
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{procedure}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Parses the `proc3` record out of a snapshot. See [`Nfs3OpCounts::from_reader`].
pub fn parse_snapshot(snapshot: &Snapshot) -> Result<Option<Nfs3OpCounts>, ParseError> {
    Nfs3OpCounts::from_reader(&mut snapshot.contents().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENTIAL: &str = "proc3 22 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21\n";

    fn parse(data: &str) -> Result<Option<Nfs3OpCounts>, ParseError> {
        Nfs3OpCounts::from_reader(&mut data.as_bytes())
    }

    #[test]
    fn test_parse_sequential_record() {
        let counts = parse(SEQUENTIAL).unwrap().unwrap();
        for procedure in Nfs3Procedure::ALL {
            assert_eq!(
                counts.get(procedure),
                Some(procedure.position() as u64),
                "{procedure}"
            );
        }
        assert_eq!(counts.getattr, 1);
        assert_eq!(counts.commit, Some(21));
    }

    #[test]
    fn test_twenty_counters_leave_commit_unset() {
        let counts = parse("proc3 20 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20\n")
            .unwrap()
            .unwrap();
        assert_eq!(counts.getattr, 1);
        assert_eq!(counts.setattr, 2);
        assert_eq!(counts.pathconf, 20);
        assert_eq!(counts.commit, None);
    }

    #[test]
    fn test_leading_field_is_not_checked() {
        let data = "proc3 21 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21\n";
        let counts = parse(data).unwrap().unwrap();
        assert_eq!(counts.getattr, 0);
        assert_eq!(counts.setattr, 1);
        assert_eq!(counts.commit, Some(20));
    }

    #[test]
    fn test_parse_real_world_file() {
        let data = "\
net 0 0 0 0
rpc 1377 0 1377
proc3 22 1100 3 215 90 0 2201 57 12 3 0 0 9 1 4 0 6 40 2 1 0 8 0
proc4 69 0 12 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
";
        let counts = parse(data).unwrap().unwrap();
        assert_eq!(counts.getattr, 1100);
        assert_eq!(counts.read, 2201);
        assert_eq!(counts.write, 57);
        assert_eq!(counts.readdirplus, 40);
        assert_eq!(counts.commit, Some(8));
    }

    #[test]
    fn test_missing_record_yields_none() {
        let data = "\
net 0 0 0 0
rpc 0 0 0
proc2 18 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
";
        assert_eq!(parse(data).unwrap(), None);
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn test_bare_tag_yields_none() {
        assert_eq!(parse("proc3\n").unwrap(), None);
    }

    #[test]
    fn test_only_first_record_is_used() {
        let data = format!("{SEQUENTIAL}proc3 22 9 9 9 9 9 9 9 9 9 9 9 9 9 9 9 9 9 9 9 9 9\n");
        let counts = parse(&data).unwrap().unwrap();
        assert_eq!(counts.getattr, 1);
    }

    #[test]
    fn test_tag_must_match_exactly() {
        let data = "proc30 22 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21\n";
        assert_eq!(parse(data).unwrap(), None);
    }

    #[test]
    fn test_invalid_value_reports_position() {
        let data = "proc3 1 2 notanumber 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21\n";
        let err = parse(data).unwrap_err();
        match err {
            ParseError::InvalidValue {
                value,
                position,
                line,
                ..
            } => {
                assert_eq!(value, "notanumber");
                assert_eq!(position, 2);
                assert_eq!(line, 1);
            }
            other => panic!("Expected InvalidValue error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_leading_field() {
        let err = parse("proc3 x 0 1 2\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { position: 0, .. }));
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let data = "proc3 22 -1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21\n";
        let err = parse(data).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { position: 1, .. }));
    }

    #[test]
    fn test_too_few_positions() {
        let data = "proc3 19 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19\n";
        let err = parse(data).unwrap_err();
        match err {
            ParseError::TooFewPositions {
                actual, expected, ..
            } => {
                assert_eq!(actual, 20);
                assert_eq!(expected, MIN_POSITIONS);
            }
            other => panic!("Expected TooFewPositions error, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_positions_are_ignored() {
        let data = "proc3 23 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 99\n";
        let counts = parse(data).unwrap().unwrap();
        assert_eq!(counts.commit, Some(21));
    }

    #[test]
    fn test_parse_with_extra_whitespace() {
        let data = "  proc3   22 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20\t21  \n";
        let counts = parse(data).unwrap().unwrap();
        assert_eq!(counts.commit, Some(21));
    }

    #[test]
    fn test_display_lists_operations() {
        let counts = parse(SEQUENTIAL).unwrap().unwrap();
        let rendered = counts.to_string();
        assert!(rendered.starts_with("getattr=1 setattr=2 "));
        assert!(rendered.ends_with("pathconf=20 commit=21"));

        let short = Nfs3OpCounts {
            pathconf: 5,
            ..Nfs3OpCounts::default()
        };
        assert!(short.to_string().ends_with("pathconf=5"));
    }
}
