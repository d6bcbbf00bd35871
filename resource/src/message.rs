/// Shown when a failure carries no usable message.
pub const FALLBACK_MESSAGE: &str = "Ha ocurrido un error inesperado";

/// Message fields a failure may expose for display.
///
/// Both methods default to `None`, so a failure type only overrides the
/// fields it actually carries.
pub trait FailureMessage {
    /// Message found in the body of a remote error response.
    fn response_message(&self) -> Option<String> {
        None
    }

    /// Message carried by the failure itself.
    fn message(&self) -> Option<String> {
        None
    }
}

/// Derive the display message for a failure.
///
/// Order: response-body message, then top-level message, then
/// [`FALLBACK_MESSAGE`]. Empty strings are skipped.
pub fn display_message<E: FailureMessage + ?Sized>(error: &E) -> String {
    error
        .response_message()
        .filter(|m| !m.is_empty())
        .or_else(|| error.message().filter(|m| !m.is_empty()))
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

impl FailureMessage for String {
    fn message(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl FailureMessage for &str {
    fn message(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Failure {
        body: Option<&'static str>,
        top: Option<&'static str>,
    }

    impl FailureMessage for Failure {
        fn response_message(&self) -> Option<String> {
            self.body.map(str::to_string)
        }

        fn message(&self) -> Option<String> {
            self.top.map(str::to_string)
        }
    }

    #[test]
    fn body_message_wins() {
        let failure = Failure {
            body: Some("Not found"),
            top: Some("Request failed with status code 404"),
        };
        assert_eq!(display_message(&failure), "Not found");
    }

    #[test]
    fn top_level_message_used_without_body() {
        let failure = Failure {
            body: None,
            top: Some("boom"),
        };
        assert_eq!(display_message(&failure), "boom");
    }

    #[test]
    fn empty_fields_fall_through() {
        let failure = Failure {
            body: Some(""),
            top: Some(""),
        };
        assert_eq!(display_message(&failure), FALLBACK_MESSAGE);
        assert_eq!(display_message(&Failure::default()), FALLBACK_MESSAGE);
    }

    #[test]
    fn plain_strings_are_top_level_messages() {
        assert_eq!(display_message(&"offline"), "offline");
        assert_eq!(display_message(&String::new()), FALLBACK_MESSAGE);
    }
}
