//! Form state: values, field errors, touched fields and submission

use std::collections::BTreeSet;
use std::future::Future;

use crate::error::{CoreError, CoreResult};
use crate::validation::{FieldErrors, Schema};

/// State of one form while the user edits it.
///
/// Errors for a field are shown only after it has been touched; `submit`
/// validates every field regardless.
#[derive(Debug, Clone, Default)]
pub struct FormState<T> {
    values: T,
    errors: FieldErrors,
    touched: BTreeSet<String>,
    submitting: bool,
}

impl<T: Schema + Clone> FormState<T> {
    pub fn new(values: T) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
            touched: BTreeSet::new(),
            submitting: false,
        }
    }

    pub fn values(&self) -> &T {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }

    pub fn is_touched(&self, path: &str) -> bool {
        self.touched.contains(path)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the current values pass validation.
    pub fn is_valid(&self) -> bool {
        self.values.check().is_ok()
    }

    /// Change values. The field is re-validated if it was already touched.
    pub fn set_field(&mut self, path: &str, update: impl FnOnce(&mut T)) {
        update(&mut self.values);
        if self.touched.contains(path) {
            self.revalidate(path);
        }
    }

    /// Mark a field as touched (blurred) and validate it.
    pub fn touch(&mut self, path: &str) {
        self.touched.insert(path.to_string());
        self.revalidate(path);
    }

    /// Replace all values and clear errors and touched fields.
    pub fn reset(&mut self, values: T) {
        *self = Self::new(values);
    }

    fn revalidate(&mut self, path: &str) {
        self.errors.remove(path);
        if let Some(message) = self.values.check_field(path) {
            self.errors.insert(path, message);
        }
    }

    /// Validate everything and run `action` with a copy of the values.
    ///
    /// On validation failure the errors are stored, every failing field is
    /// marked touched, and `CoreError::Validation` is returned without
    /// invoking `action`.
    pub async fn submit<F, Fut, R>(&mut self, action: F) -> CoreResult<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = CoreResult<R>>,
    {
        if let Err(errors) = self.values.check() {
            for (path, _) in errors.iter() {
                self.touched.insert(path.to_string());
            }
            self.errors = errors.clone();
            return Err(CoreError::Validation(errors));
        }

        self.errors = FieldErrors::new();
        self.submitting = true;
        let result = action(self.values.clone()).await;
        self.submitting = false;

        // Server-side field errors are surfaced like local ones.
        if let Err(CoreError::Validation(ref errors)) = result {
            self.errors = errors.clone();
        }
        result
    }
}
