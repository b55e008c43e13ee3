//! Use Case Result Type
//!
//! The outcome of a use case. Success is only produced by the use-case layer
//! after the aggregate's events were appended to the event store.

use super::error::UseCaseError;

pub enum UseCaseResult<T> {
    Success(T),
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    /// Only the use-case layer produces successes.
    pub(crate) fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UseCaseResult::Failure(_))
    }

    /// # Panics
    ///
    /// Panics on `Failure`.
    pub fn unwrap(self) -> T {
        match self {
            UseCaseResult::Success(v) => v,
            UseCaseResult::Failure(e) => panic!("Called unwrap on a Failure: {}", e),
        }
    }

    /// # Panics
    ///
    /// Panics on `Success`.
    pub fn unwrap_err(self) -> UseCaseError {
        match self {
            UseCaseResult::Success(_) => panic!("Called unwrap_err on a Success"),
            UseCaseResult::Failure(e) => e,
        }
    }

    pub fn error(&self) -> Option<&UseCaseError> {
        match self {
            UseCaseResult::Success(_) => None,
            UseCaseResult::Failure(e) => Some(e),
        }
    }

    pub fn map<U, F>(self, f: F) -> UseCaseResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            UseCaseResult::Success(v) => UseCaseResult::Success(f(v)),
            UseCaseResult::Failure(e) => UseCaseResult::Failure(e),
        }
    }

    pub fn into_result(self) -> Result<T, UseCaseError> {
        match self {
            UseCaseResult::Success(v) => Ok(v),
            UseCaseResult::Failure(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, UseCaseError>> for UseCaseResult<T> {
    fn from(result: Result<T, UseCaseError>) -> Self {
        match result {
            Ok(v) => UseCaseResult::Success(v),
            Err(e) => UseCaseResult::Failure(e),
        }
    }
}

impl<T> From<UseCaseResult<T>> for Result<T, UseCaseError> {
    fn from(result: UseCaseResult<T>) -> Self {
        result.into_result()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UseCaseResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCaseResult::Success(v) => f.debug_tuple("Success").field(v).finish(),
            UseCaseResult::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_std_result() {
        let ok: UseCaseResult<u32> = Ok::<_, UseCaseError>(7).into();
        assert!(ok.is_success());
        assert_eq!(ok.unwrap(), 7);

        let err: UseCaseResult<u32> =
            Err::<u32, _>(UseCaseError::role_violation("NOPE", "no")).into();
        assert!(err.is_failure());
        assert_eq!(err.error().map(|e| e.code()), Some("NOPE"));
    }

    #[test]
    fn test_map_keeps_failure() {
        let result: UseCaseResult<u32> =
            UseCaseResult::failure(UseCaseError::validation("CODE", "message"));
        let mapped = result.map(|v| v * 2);
        assert_eq!(mapped.unwrap_err().code(), "CODE");
    }
}
