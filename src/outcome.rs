//! The normalized verification result contract.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::SigninError;

/// Outcome of a sign-in verification.
///
/// This is the only shape the dispatcher ever returns. It serializes to
/// exactly `{"success":true,"email":...}` or `{"success":false,"error":...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigninOutcome {
    /// The provider confirmed the credential and yielded a verified email.
    Verified { email: String },
    /// Verification failed; `error` is a human-readable description.
    Rejected { error: String },
}

impl SigninOutcome {
    /// Successful outcome carrying the verified email.
    #[must_use]
    pub fn verified(email: impl Into<String>) -> Self {
        SigninOutcome::Verified {
            email: email.into(),
        }
    }

    /// Failed outcome carrying an error description.
    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        SigninOutcome::Rejected {
            error: error.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SigninOutcome::Verified { .. })
    }

    /// The verified email, if successful.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            SigninOutcome::Verified { email } => Some(email),
            SigninOutcome::Rejected { .. } => None,
        }
    }

    /// The error description, if failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            SigninOutcome::Verified { .. } => None,
            SigninOutcome::Rejected { error } => Some(error),
        }
    }
}

impl From<SigninError> for SigninOutcome {
    fn from(err: SigninError) -> Self {
        let message = err.to_string();
        if message.is_empty() {
            SigninOutcome::rejected(SigninError::Unknown.to_string())
        } else {
            SigninOutcome::rejected(message)
        }
    }
}

impl<E: Into<SigninError>> From<Result<String, E>> for SigninOutcome {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(email) => SigninOutcome::Verified { email },
            Err(err) => {
                let err: SigninError = err.into();
                err.into()
            }
        }
    }
}

impl Serialize for SigninOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SigninOutcome", 2)?;
        match self {
            SigninOutcome::Verified { email } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("email", email)?;
            }
            SigninOutcome::Rejected { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for SigninOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(field_identifier, rename_all = "lowercase")]
        enum Field {
            Success,
            Email,
            Error,
            #[serde(other)]
            Other,
        }

        struct OutcomeVisitor;

        impl<'de> Visitor<'de> for OutcomeVisitor {
            type Value = SigninOutcome;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map with a `success` flag and `email` or `error`")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut success: Option<bool> = None;
                let mut email: Option<String> = None;
                let mut error: Option<String> = None;

                while let Some(field) = map.next_key::<Field>()? {
                    match field {
                        Field::Success => success = Some(map.next_value()?),
                        Field::Email => email = Some(map.next_value()?),
                        Field::Error => error = Some(map.next_value()?),
                        Field::Other => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                match success.ok_or_else(|| de::Error::missing_field("success"))? {
                    true => Ok(SigninOutcome::Verified {
                        email: email.ok_or_else(|| de::Error::missing_field("email"))?,
                    }),
                    false => Ok(SigninOutcome::Rejected {
                        error: error.ok_or_else(|| de::Error::missing_field("error"))?,
                    }),
                }
            }
        }

        deserializer.deserialize_map(OutcomeVisitor)
    }
}
