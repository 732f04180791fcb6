use std::io::{self, Write};

use memchr::memchr;
use thiserror::Error;

use crate::event::ParseEvent;

/// Serializes parsed lines back into manifest text.
pub trait Dump {
    fn dump<W: Write>(&self, w: &mut W) -> io::Result<()>;
}

/// A reason an event cannot survive a dump-and-reparse round trip.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DumpError {
    /// An embedded LF would split the event into two lines.
    #[error("payload contains LF ('\\n')")]
    PayloadContainsLf,
    /// A colon in a tag name would move the name/value split.
    #[error("tag name contains ':'")]
    NameContainsColon,
    /// An empty URI dumps as a blank line, which the scanner suppresses.
    #[error("URI is empty")]
    EmptyUri,
    /// A URI starting with `#` reparses as a comment or tag.
    #[error("URI starts with '#'")]
    UriStartsWithHash,
}

impl<B: AsRef<[u8]>> ParseEvent<B> {
    /// Checks that dumping this event and rescanning it yields the event
    /// back. Events produced by the scanner always pass; hand-constructed
    /// ones may not.
    pub fn validate(&self) -> Result<(), DumpError> {
        match self {
            ParseEvent::Comment { body } => check_lf(body.as_ref()),
            ParseEvent::Uri { uri } => {
                let uri = uri.as_ref();
                if uri.is_empty() {
                    Err(DumpError::EmptyUri)
                } else if uri[0] == b'#' {
                    Err(DumpError::UriStartsWithHash)
                } else {
                    check_lf(uri)
                }
            }
            ParseEvent::TagNoValue { name } => {
                check_name(name.as_ref())?;
                check_lf(name.as_ref())
            }
            ParseEvent::TagWithValue { name, value } | ParseEvent::ExtInf { name, value, .. } => {
                check_name(name.as_ref())?;
                check_lf(name.as_ref())?;
                check_lf(value.as_ref())
            }
        }
    }
}

fn check_lf(field: &[u8]) -> Result<(), DumpError> {
    match memchr(b'\n', field) {
        Some(_) => Err(DumpError::PayloadContainsLf),
        None => Ok(()),
    }
}

fn check_name(name: &[u8]) -> Result<(), DumpError> {
    match memchr(b':', name) {
        Some(_) => Err(DumpError::NameContainsColon),
        None => Ok(()),
    }
}

impl<B: AsRef<[u8]>> Dump for ParseEvent<B> {
    fn dump<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            ParseEvent::Comment { body } => {
                w.write_all(b"#")?;
                w.write_all(body.as_ref())?;
            }
            ParseEvent::Uri { uri } => w.write_all(uri.as_ref())?,
            ParseEvent::TagNoValue { name } => {
                w.write_all(b"#")?;
                w.write_all(name.as_ref())?;
            }
            // The EXTINF duration is a subrange of the value, so the value
            // alone reproduces the line.
            ParseEvent::TagWithValue { name, value } | ParseEvent::ExtInf { name, value, .. } => {
                w.write_all(b"#")?;
                w.write_all(name.as_ref())?;
                w.write_all(b":")?;
                w.write_all(value.as_ref())?;
            }
        }
        w.write_all(b"\n")
    }
}

impl<T: Dump> Dump for [T] {
    fn dump<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for item in self {
            item.dump(w)?;
        }
        Ok(())
    }
}
