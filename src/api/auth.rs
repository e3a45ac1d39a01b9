use crate::error::{ReportError, Result};
use axum::http::{header::AUTHORIZATION, HeaderMap};

pub const API_KEY_HEADER: &str = "x-api-key";

/// 校验调用方密钥: `Authorization: Bearer <secret>` 或 `x-api-key: <secret>`
/// 未配置密钥时放行
pub fn authorize(headers: &HeaderMap, secret: Option<&str>) -> Result<()> {
    let Some(secret) = secret else {
        return Ok(());
    };

    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    match (bearer, api_key) {
        (None, None) => Err(ReportError::Unauthorized("missing credentials".to_string())),
        (b, k) if b == Some(secret) || k == Some(secret) => Ok(()),
        _ => Err(ReportError::Unauthorized("invalid credentials".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(k, v) in pairs {
            map.insert(k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn open_when_no_secret_configured() {
        assert!(authorize(&HeaderMap::new(), None).is_ok());
    }

    #[test]
    fn accepts_bearer_or_api_key() {
        assert!(authorize(&headers(&[("authorization", "Bearer s3cret")]), Some("s3cret")).is_ok());
        assert!(authorize(&headers(&[("x-api-key", "s3cret")]), Some("s3cret")).is_ok());
    }

    #[test]
    fn rejects_missing_or_wrong_credentials() {
        assert!(matches!(
            authorize(&HeaderMap::new(), Some("s3cret")),
            Err(ReportError::Unauthorized(_))
        ));
        assert!(matches!(
            authorize(&headers(&[("authorization", "Bearer nope")]), Some("s3cret")),
            Err(ReportError::Unauthorized(_))
        ));
        assert!(matches!(
            authorize(&headers(&[("authorization", "s3cret")]), Some("s3cret")),
            Err(ReportError::Unauthorized(_))
        ));
    }
}
