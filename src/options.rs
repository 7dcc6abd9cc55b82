//! Effective option resolution.
//!
//! Options are looked up at three levels: a value passed with the call wins
//! over one configured on the tracker, which wins over the built-in default.

/// First present value among `call`, `configured` and `default`.
pub fn coalesce<T>(call: Option<T>, configured: Option<T>, default: Option<T>) -> Option<T> {
    call.or(configured).or(default)
}

/// Like [`coalesce`] for a default that always exists, computed only when
/// both other levels are unset.
pub fn coalesce_with<T>(call: Option<T>, configured: Option<T>, default: impl FnOnce() -> T) -> T {
    call.or(configured).unwrap_or_else(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(coalesce(Some(1), Some(2), Some(3)), Some(1));
        assert_eq!(coalesce(None, Some(2), Some(3)), Some(2));
        assert_eq!(coalesce(None, None, Some(3)), Some(3));
        assert_eq!(coalesce::<u8>(None, None, None), None);
    }

    #[test]
    fn test_default_is_lazy() {
        let value = coalesce_with(Some("call"), None, || panic!("default evaluated"));
        assert_eq!(value, "call");
    }
}
