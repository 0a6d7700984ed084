use std::fmt::{self, Debug, Display};

pub use self::ext::ResultExt;

mod ext;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[macro_export]
macro_rules! bail {
    ($(type = $type:expr,)? $msg:expr) => {
        return Err($crate::chime_error!($(type = $type,)? $msg));
    };
}

#[macro_export]
macro_rules! chime_error {
    (type = $type:expr, $msg:expr) => {
        $crate::Error::msg($msg).with_error_type($type)
    };
    ($msg:expr) => {
        $crate::chime_error!(type = $crate::ErrorType::Other, $msg)
    };
}

/// Pipeline stage an error originated from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorType {
    /// Walking the source tree failed. Aborts the whole run.
    Discovery,
    /// The stylesheet failed to compile or an import could not be resolved
    Compile,
    /// A stale output file could not be removed
    Cleanup,
    /// The vendor-prefixing pass rejected the compiled CSS
    PostProcess,
    /// The final CSS could not be written
    Write,
    Other,
}

impl ErrorType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Compile => "compile",
            Self::Cleanup => "cleanup",
            Self::PostProcess => "post-process",
            Self::Write => "write",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Error {
    ty: ErrorType,
    inner: eyre::Report,
}

impl Error {
    #[inline]
    pub fn msg<M>(msg: M) -> Self
    where
        M: Debug + Display + Send + Sync + 'static,
    {
        eyre::Report::msg(msg).into()
    }

    #[must_use]
    pub fn error_type(&self) -> ErrorType {
        self.ty
    }

    #[must_use]
    pub fn into_error(self) -> eyre::Report {
        self.inner
    }

    #[must_use]
    pub fn with_error_type(self, ty: ErrorType) -> Self {
        Self { ty, ..self }
    }
}

impl<T> From<T> for Error
where
    T: Into<eyre::Report>,
{
    fn from(value: T) -> Self {
        Self {
            ty: ErrorType::Other,
            inner: value.into(),
        }
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <eyre::Report as fmt::Display>::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod test {
    use crate::{Error, ErrorType, ResultExt};
    use std::io;

    fn cleanup() -> crate::Result<()> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied)).with_error_type(ErrorType::Cleanup)
    }

    fn compile() -> crate::Result<()> {
        crate::bail!(type = ErrorType::Compile, "expected \";\"");
    }

    #[test]
    fn defaults_to_other() {
        let err = Error::msg("boom");
        assert_eq!(err.error_type(), ErrorType::Other);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn ext_tags_error() {
        let err = cleanup().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Cleanup);
    }

    #[test]
    fn bail_keeps_message() {
        let err = compile().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Compile);
        assert_eq!(err.to_string(), "expected \";\"");
    }

    #[test]
    fn into_error_keeps_report() {
        let err = cleanup().unwrap_err().into_error();
        assert!(err.downcast_ref::<io::Error>().is_some());
    }
}
