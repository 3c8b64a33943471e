/// Name of the httpOnly session cookie.
pub const SESSION_COOKIE: &str = "token";

/// `Set-Cookie` value for a freshly issued token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={max_age_secs}",
        if secure { " Secure;" } else { "" },
    )
}

/// `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
