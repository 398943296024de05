/**
 * Auth Cookies
 *
 * The access token travels in `accessToken` on every path. The refresh token
 * is scoped to the refresh endpoint so the browser only sends it there.
 * Both cookies are HttpOnly and SameSite=Strict.
 */

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::backend::auth::tokens::{ACCESS_TOKEN_TTL_MINUTES, REFRESH_TOKEN_TTL_DAYS};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Path the refresh cookie is restricted to
pub const REFRESH_PATH: &str = "/auth/refresh";

fn auth_cookie(
    name: &'static str,
    value: String,
    path: &'static str,
    max_age: Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path(path)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// A cookie that tells the browser to drop `name` at `path`
fn removal_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path(path).build();
    cookie.make_removal();
    cookie
}

pub fn set_access_cookie(jar: CookieJar, access_token: String, secure: bool) -> CookieJar {
    jar.add(auth_cookie(
        ACCESS_TOKEN_COOKIE,
        access_token,
        "/",
        Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
        secure,
    ))
}

pub fn set_refresh_cookie(jar: CookieJar, refresh_token: String, secure: bool) -> CookieJar {
    jar.add(auth_cookie(
        REFRESH_TOKEN_COOKIE,
        refresh_token,
        REFRESH_PATH,
        Duration::days(REFRESH_TOKEN_TTL_DAYS),
        secure,
    ))
}

/// Set both auth cookies
pub fn set_auth_cookies(
    jar: CookieJar,
    access_token: String,
    refresh_token: String,
    secure: bool,
) -> CookieJar {
    let jar = set_access_cookie(jar, access_token, secure);
    set_refresh_cookie(jar, refresh_token, secure)
}

/// Expire both auth cookies, whether or not the request carried them
pub fn clear_auth_cookies(jar: CookieJar) -> CookieJar {
    jar.add(removal_cookie(ACCESS_TOKEN_COOKIE, "/"))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE, REFRESH_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::SET_COOKIE;
    use axum::response::IntoResponse;

    fn set_cookie_headers(jar: CookieJar) -> Vec<String> {
        let response = jar.into_response();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let jar = set_auth_cookies(CookieJar::new(), "acc".into(), "ref".into(), true);
        let headers = set_cookie_headers(jar);
        assert_eq!(headers.len(), 2);

        let access = headers.iter().find(|h| h.starts_with("accessToken=acc")).unwrap();
        assert!(access.contains("HttpOnly"));
        assert!(access.contains("SameSite=Strict"));
        assert!(access.contains("Secure"));
        assert!(access.contains("Path=/"));
        assert!(access.contains("Max-Age=900"));

        let refresh = headers.iter().find(|h| h.starts_with("refreshToken=ref")).unwrap();
        assert!(refresh.contains("Path=/auth/refresh"));
        assert!(refresh.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_insecure_cookies_in_development() {
        let jar = set_access_cookie(CookieJar::new(), "acc".into(), false);
        let headers = set_cookie_headers(jar);
        assert!(!headers[0].contains("Secure"));
    }

    #[test]
    fn test_clear_emits_removals_without_request_cookies() {
        let headers = set_cookie_headers(clear_auth_cookies(CookieJar::new()));
        assert_eq!(headers.len(), 2);
        for header in &headers {
            assert!(header.contains("Max-Age=0"), "{header}");
        }
        assert!(headers.iter().any(|h| h.starts_with("accessToken=;")));
        assert!(headers
            .iter()
            .any(|h| h.starts_with("refreshToken=;") && h.contains("Path=/auth/refresh")));
    }
}
