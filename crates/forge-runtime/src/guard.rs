use std::any::Any;
use std::error::Error;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};

const FALLBACK_MESSAGE: &str = "panic";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Succeeded(T),
    Failed(String),
}

/// Runs `f`, turning both its error and any unwinding panic into [`Outcome::Failed`].
///
/// This is the only place unwinding is caught; nothing raised inside `f` escapes it.
pub fn guarded_call<T, E, F>(f: F) -> Outcome<T>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Outcome::Succeeded(value),
        Ok(Err(err)) => Outcome::Failed(err.to_string()),
        Err(payload) => Outcome::Failed(panic_message(payload.as_ref())),
    }
}

/// Message for a panic payload: an error's own message, text verbatim, `"panic"` otherwise.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(err) = payload.downcast_ref::<Box<dyn Error + Send + Sync>>() {
        return err.to_string();
    }
    if let Some(err) = payload.downcast_ref::<Box<dyn Error + Send>>() {
        return err.to_string();
    }
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        return (*text).to_string();
    }
    if let Some(text) = payload.downcast_ref::<String>() {
        return text.clone();
    }
    FALLBACK_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Overflow;

    impl Display for Overflow {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "overflow")
        }
    }

    impl Error for Overflow {}

    #[test]
    fn test_success_passes_value_through() {
        let outcome = guarded_call(|| Ok::<_, String>(42));
        assert_eq!(outcome, Outcome::Succeeded(42));
    }

    #[test]
    fn test_error_uses_display() {
        let outcome = guarded_call(|| Err::<i32, _>(Overflow));
        assert_eq!(outcome, Outcome::Failed("overflow".to_string()));
    }

    #[test]
    fn test_panic_with_str() {
        let outcome = guarded_call(|| -> Result<i32, String> { panic!("divide by zero") });
        assert_eq!(outcome, Outcome::Failed("divide by zero".to_string()));
    }

    #[test]
    fn test_panic_with_formatted_string() {
        let outcome = guarded_call(|| -> Result<(), String> { panic!("bad code {}", 7) });
        assert_eq!(outcome, Outcome::Failed("bad code 7".to_string()));
    }

    #[test]
    fn test_panic_with_error_value_reuses_its_message() {
        let outcome = guarded_call(|| -> Result<(), String> {
            let err: Box<dyn Error + Send + Sync> = Box::new(Overflow);
            panic::panic_any(err)
        });
        assert_eq!(outcome, Outcome::Failed("overflow".to_string()));
    }

    #[test]
    fn test_panic_with_opaque_payload() {
        let outcome = guarded_call(|| -> Result<(), String> { panic::panic_any(17_u8) });
        assert_eq!(outcome, Outcome::Failed("panic".to_string()));
    }

    #[test]
    fn test_panic_message_directly() {
        let payload: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(panic_message(payload.as_ref()), "static text");

        let payload: Box<dyn Any + Send> = Box::new(3.5_f64);
        assert_eq!(panic_message(payload.as_ref()), "panic");
    }
}
