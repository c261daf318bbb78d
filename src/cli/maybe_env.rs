use std::{
    borrow::Cow,
    env::var,
    error::Error as StdError,
    ffi::OsStr,
    fmt::{Display, Formatter},
    marker::PhantomData,
    str::FromStr,
};

use clap::{
    Arg, Command,
    builder::{NonEmptyStringValueParser, TypedValueParser, ValueParserFactory},
};

use crate::error::Error;

const ENV_PREFIX: &str = "env:";

/// A value that may be loaded from the environment.
///
/// To load from the environment, the value must be in the format
/// `env:VAR_NAME`.
///
/// `T` must be [`FromStr`] for this to be used as a [`clap`] value type.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum MaybeEnv<T> {
    /// Value refers to an environment variable.
    EnvVar(String),

    /// Value was provided directly.
    Value(T),
}

impl<T> MaybeEnv<T>
where
    T: Clone + FromStr<Err: StdError + Send + Sync + 'static>,
{
    /// Resolves this value, looking variables up in the process environment.
    pub fn resolve(&self) -> Result<Cow<'_, T>, Error> {
        self.resolve_with(|name| var(name).ok())
    }

    /// Resolves this value with a custom variable lookup.
    pub fn resolve_with(
        &self,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Cow<'_, T>, Error> {
        match self {
            MaybeEnv::EnvVar(var_name) => {
                let value = lookup(var_name).ok_or_else(|| Error::CredentialsMissing {
                    name: var_name.clone(),
                })?;
                let value = value.parse().map_err(|error| Error::InvalidSetting {
                    name: var_name.clone(),
                    source: Box::new(error),
                })?;

                Ok(Cow::Owned(value))
            }
            MaybeEnv::Value(value) => Ok(Cow::Borrowed(value)),
        }
    }
}

impl<T> Display for MaybeEnv<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MaybeEnv::EnvVar(var_name) => write!(f, "{ENV_PREFIX}{var_name}"),
            MaybeEnv::Value(value) => value.fmt(f),
        }
    }
}

impl<T> ValueParserFactory for MaybeEnv<T> {
    type Parser = MaybeEnvParser<T>;

    fn value_parser() -> Self::Parser {
        MaybeEnvParser(PhantomData)
    }
}

/// Value parser for [`MaybeEnv`]s.
#[derive(Clone, Debug)]
pub struct MaybeEnvParser<T>(PhantomData<fn() -> T>);

impl<T> TypedValueParser for MaybeEnvParser<T>
where
    T: Clone + Send + Sync + 'static,
    T: FromStr<Err: Into<Box<dyn StdError + Send + Sync>>>,
{
    type Value = MaybeEnv<T>;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        // Parse as a string
        let inner = NonEmptyStringValueParser::default();
        let value2 = inner.parse_ref(cmd, arg, value)?;

        // Parse the string as `env:VAR_NAME` if possible
        if let Some(var_name) = value2.strip_prefix(ENV_PREFIX)
            && is_var_name(var_name)
        {
            return Ok(MaybeEnv::EnvVar(var_name.to_string()));
        }

        TypedValueParser::parse_ref(&T::from_str, cmd, arg, value).map(MaybeEnv::Value)
    }
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
