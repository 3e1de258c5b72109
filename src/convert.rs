//! Conversion strategies applied to raw stored values on read.

/// Converts the raw bytes stored under a key into a typed value.
///
/// The error string is wrapped into `CacheError::Conversion` together with
/// the key that was read.
pub trait Convert {
    type Output;

    fn convert(&self, raw: Vec<u8>) -> Result<Self::Output, String>;
}

/// Identity: return the stored bytes untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

/// Decode the stored bytes as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

/// Parse the stored bytes as a decimal integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

/// Parse the stored bytes as a float.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

impl Convert for Raw {
    type Output = Vec<u8>;

    fn convert(&self, raw: Vec<u8>) -> Result<Vec<u8>, String> {
        Ok(raw)
    }
}

impl Convert for Utf8 {
    type Output = String;

    fn convert(&self, raw: Vec<u8>) -> Result<String, String> {
        String::from_utf8(raw).map_err(|e| format!("invalid UTF-8: {}", e))
    }
}

impl Convert for Integer {
    type Output = i64;

    fn convert(&self, raw: Vec<u8>) -> Result<i64, String> {
        let text = Utf8.convert(raw)?;
        text.trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid integer literal {:?}: {}", text, e))
    }
}

impl Convert for Float {
    type Output = f64;

    fn convert(&self, raw: Vec<u8>) -> Result<f64, String> {
        let text = Utf8.convert(raw)?;
        text.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid float literal {:?}: {}", text, e))
    }
}

impl<T, F> Convert for F
where
    F: Fn(Vec<u8>) -> Result<T, String>,
{
    type Output = T;

    fn convert(&self, raw: Vec<u8>) -> Result<T, String> {
        self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_converters() {
        assert_eq!(Raw.convert(b"abc".to_vec()).unwrap(), b"abc");
        assert_eq!(Utf8.convert(b"abc".to_vec()).unwrap(), "abc");
        assert_eq!(Integer.convert(b"-17".to_vec()).unwrap(), -17);
        assert_eq!(Float.convert(b"2.25".to_vec()).unwrap(), 2.25);
    }

    #[test]
    fn test_conversion_failures() {
        assert!(Utf8.convert(vec![0xff, 0xfe]).is_err());
        assert!(Integer.convert(b"foo".to_vec()).is_err());
        assert!(Integer.convert(b"1.5".to_vec()).is_err());
        assert!(Float.convert(b"bar".to_vec()).is_err());
    }

    #[test]
    fn test_closure_converter() {
        let len = |raw: Vec<u8>| -> Result<usize, String> { Ok(raw.len()) };
        assert_eq!(len.convert(b"four".to_vec()).unwrap(), 4);
    }
}
