use std::{fmt, io};
use std::panic::Location;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error with keyed context and a chain of preceding errors.
///
/// Errors render as an indented tree: the outermost message first, each
/// chained predecessor one level deeper, context pairs below the message
/// they belong to. Construct with [`error!`] or any `From` conversion and
/// attach outer context with [`Chainable`].
#[derive(Debug, Clone)]
pub struct Error {
    message: String,
    context: Vec<(Option<String>, String)>,
    prev: Option<Box<Error>>,
    _location: &'static Location<'static>,
}

impl Error {
    #[track_caller]
    pub fn new<M: fmt::Display>(message: M) -> Self {
        Error {
            message: message.to_string(),
            context: vec![],
            prev: None,
            _location: Location::caller(),
        }
    }

    /// Attaches a `key: value` context pair to this error.
    pub fn context<K: fmt::Display, V: fmt::Display>(mut self, key: K, value: V) -> Self {
        self.context.push((Some(key.to_string()), value.to_string()));
        self
    }

    /// Attaches an unkeyed context line to this error.
    pub fn note<V: fmt::Display>(mut self, value: V) -> Self {
        self.context.push((None, value.to_string()));
        self
    }

    /// Chains `self` behind `other`: `other` becomes the outermost error and
    /// `self` the innermost link of its `prev` chain.
    pub fn chain(self, mut other: Error) -> Self {
        fn attach(error: Error, behind: &mut Error) {
            match behind.prev.as_mut() {
                Some(prev) => attach(error, prev),
                None => behind.prev = Some(Box::new(error)),
            }
        }

        attach(self, &mut other);
        other
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render(e: &Error, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let indent = "    ".repeat(depth);
            writeln!(f, "{indent}{}", e.message.replace('\n', &format!("\n{indent}")))?;
            for (key, value) in &e.context {
                match key {
                    Some(key) => writeln!(f, "{indent}{key}: {value}")?,
                    None => writeln!(f, "{indent}{value}")?,
                }
            }

            if std::env::var_os("RUST_BACKTRACE").is_some() {
                writeln!(f, "{indent}[{}]", e._location)?;
            }

            match &e.prev {
                Some(prev) => render(prev, depth + 1, f),
                None => Ok(()),
            }
        }

        render(self, 0, f)
    }
}

impl From<String> for Error {
    #[track_caller]
    fn from(message: String) -> Self {
        Error::new(message)
    }
}

impl From<&str> for Error {
    #[track_caller]
    fn from(message: &str) -> Self {
        Error::new(message)
    }
}

macro_rules! impl_from_std_error {
    ($($T:ty),* $(,)?) => ($(
        impl From<$T> for Error {
            #[track_caller]
            fn from(error: $T) -> Self {
                let mut sources = vec![];
                let mut source = std::error::Error::source(&error);
                while let Some(e) = source {
                    sources.push(e.to_string());
                    source = e.source();
                }

                let mut this = Error::new(&error);
                for message in sources {
                    this = this.note(message);
                }

                this
            }
        }
    )*)
}

impl_from_std_error! {
    io::Error,
    toml::de::Error,
    minijinja::Error,
    std::path::StripPrefixError,
}

#[cfg(feature = "sass")]
impl_from_std_error!(Box<grass::Error>);

/// Constructs an [`Error`] from a message and optional context arguments.
///
/// ```rust
/// # use shelley::error;
/// let host = "";
/// let e = error! {
///     "remote host is not reachable",
///     "host" => host,
///     "transfers are skipped for empty hosts",
/// };
/// ```
#[macro_export]
macro_rules! error {
    ($msg:expr $(, $($rest:tt)*)?) => {{
        let e = $crate::error::Error::new($msg);
        $crate::error!(@ctx e $($($rest)*)?)
    }};

    (@ctx $e:ident) => { $e };

    (@ctx $e:ident $key:expr => $value:expr $(, $($rest:tt)*)?) => {{
        let e = $e.context($key, $value);
        $crate::error!(@ctx e $($($rest)*)?)
    }};

    (@ctx $e:ident $value:expr $(, $($rest:tt)*)?) => {{
        let e = $e.note($value);
        $crate::error!(@ctx e $($($rest)*)?)
    }};
}

/// [`error!`], wrapped in `Err`.
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into())),
        }
    }

    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into())),
        }
    }
}
