//! The two text inputs feeding a write.

use shared_types::WriteRequest;

use crate::error::WriteGateError;

/// Current key and value text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteInputs {
    key: String,
    value: String,
}

impl WriteInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Writing is allowed iff both inputs are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }

    /// Capture the inputs as a request and reset both to empty.
    ///
    /// Incomplete inputs are left untouched.
    pub fn take(&mut self) -> Result<WriteRequest, WriteGateError> {
        if !self.is_complete() {
            return Err(WriteGateError::Incomplete {
                key_empty: self.key.is_empty(),
                value_empty: self.value.is_empty(),
            });
        }

        let request = WriteRequest::from_text(&self.key, &self.value)?;
        self.clear();
        Ok(request)
    }

    pub fn clear(&mut self) {
        self.key.clear();
        self.value.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_take_resets_inputs() {
        let mut inputs = WriteInputs::new();
        inputs.set_key("greeting");
        inputs.set_value("hi");

        let request = inputs.take().expect("complete");
        assert_eq!(request.key.as_str(), "greeting");
        assert_eq!(request.payload.as_bytes(), b"hi");
        assert_eq!(inputs, WriteInputs::new());
    }

    #[test]
    fn test_take_incomplete_keeps_inputs() {
        let mut inputs = WriteInputs::new();
        inputs.set_value("orphan");

        assert_eq!(
            inputs.take(),
            Err(WriteGateError::Incomplete {
                key_empty: true,
                value_empty: false
            })
        );
        assert_eq!(inputs.value(), "orphan");
    }

    proptest! {
        #[test]
        fn test_complete_iff_both_non_empty(key in ".{0,8}", value in ".{0,8}") {
            let mut inputs = WriteInputs::new();
            inputs.set_key(key.clone());
            inputs.set_value(value.clone());
            prop_assert_eq!(inputs.is_complete(), !key.is_empty() && !value.is_empty());
        }

        #[test]
        fn test_emptying_either_field_disables(key in ".{1,8}", value in ".{1,8}", clear_key: bool) {
            let mut inputs = WriteInputs::new();
            inputs.set_key(key);
            inputs.set_value(value);
            prop_assert!(inputs.is_complete());

            if clear_key {
                inputs.set_key("");
            } else {
                inputs.set_value("");
            }
            prop_assert!(!inputs.is_complete());
        }
    }
}
