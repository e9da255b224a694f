//! Unified error type.

use std::fmt;

/// The error type returned by breeze's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures and names the operation that hit them — today
/// that is binding the listening socket; per-connection accept errors are
/// logged and survived, never returned.
#[derive(Debug)]
pub struct Error {
    op: &'static str,
    source: std::io::Error,
}

impl Error {
    pub(crate) fn bind(source: std::io::Error) -> Self {
        Self { op: "bind", source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.op, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_names_the_failing_operation() {
        let e = Error::bind(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address in use",
        ));
        assert_eq!(e.to_string(), "bind: address in use");
        assert!(e.source().is_some());
    }
}
