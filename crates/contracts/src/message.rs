//! Message - the unit of work

use crate::DeliveryError;

/// One text body scheduled for delivery
///
/// Created by the producer with `error` unset. A worker attaches an error
/// exactly once, when delivery fails. Messages have no identity beyond their
/// content; duplicates are independent units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Body posted verbatim
    pub body: String,

    /// Delivery failure, if any
    pub error: Option<DeliveryError>,
}

impl Message {
    /// Create a fresh message with no error
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            error: None,
        }
    }

    /// Attach a delivery error
    pub fn with_error(mut self, error: DeliveryError) -> Self {
        self.error = Some(error);
        self
    }

}

impl From<&str> for Message {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

impl From<String> for Message {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_has_no_error() {
        let m = Message::new("hello");
        assert_eq!(m.body, "hello");
        assert!(m.error.is_none());
    }

    #[test]
    fn test_with_error_attaches_error() {
        let m = Message::from("hello").with_error(DeliveryError::status(500));
        assert_eq!(m.error, Some(DeliveryError::Status { status: 500 }));
    }
}
