use chrono::ParseError as ChronoError;

/// Discord RPC model `Result` alias type.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Error produced when a payload cannot be turned into an entity.
///
/// Every variant names the wire field it concerns, so a failure can be logged
/// without keeping the offending payload around. Errors raised while decoding
/// a nested entity are passed up unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A required field was absent or `null`
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A field was present but had the wrong shape
    #[error("malformed field `{field}`, expected {expected}")]
    MalformedField {
        /// Wire name of the field
        field: &'static str,
        /// Shape the field should have had
        expected: &'static str,
    },

    /// A snowflake was not a non-negative base-10 integer
    #[error("invalid identifier in `{field}`: {value}")]
    InvalidIdentifier {
        /// Wire name of the field
        field: &'static str,
        /// The offending text
        value: String,
    },

    /// A string did not name any known symbol of its enumeration
    #[error("unknown value for `{field}`: {value:?}")]
    UnknownEnumValue {
        /// Wire name of the field
        field: &'static str,
        /// The symbol as received, before normalization
        value: String,
    },

    /// A colour was not of the form `#RRGGBB`
    #[error("invalid colour in `{field}`: {value:?}")]
    InvalidColour {
        /// Wire name of the field
        field: &'static str,
        /// The colour string as received
        value: String,
    },

    /// A timestamp was not an RFC 3339 date-time
    #[error("invalid timestamp in `{field}`: {value:?} ({source})")]
    InvalidTimestamp {
        /// Wire name of the field
        field: &'static str,
        /// The timestamp string as received
        value: String,
        /// Why chrono refused it
        #[source]
        source: ChronoError,
    },

    /// The entity is reserved and has no decoder yet
    #[error("decoding `{0}` is not implemented")]
    NotImplemented(&'static str),
}

impl Error {
    /// The wire field this error concerns, if any.
    pub fn field(&self) -> Option<&'static str> {
        match *self {
            Error::MissingField(field)
            | Error::MalformedField { field, .. }
            | Error::InvalidIdentifier { field, .. }
            | Error::UnknownEnumValue { field, .. }
            | Error::InvalidColour { field, .. }
            | Error::InvalidTimestamp { field, .. } => Some(field),
            Error::NotImplemented(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let err = Error::MalformedField {
            field: "members",
            expected: "an array",
        };
        assert_eq!(
            err.to_string(),
            "malformed field `members`, expected an array"
        );
        assert_eq!(Error::MissingField("id").to_string(), "missing field `id`");
    }

    #[test]
    fn field_accessor() {
        assert_eq!(Error::MissingField("timestamp").field(), Some("timestamp"));
        assert_eq!(Error::NotImplemented("channel").field(), None);
    }

    #[test]
    fn timestamp_error_keeps_its_source() {
        use std::error::Error as _;

        let source = chrono::DateTime::parse_from_rfc3339("yesterday").unwrap_err();
        let err = Error::InvalidTimestamp {
            field: "timestamp",
            value: "yesterday".into(),
            source,
        };
        assert!(err.source().is_some());
    }
}
