// Challenge-response login primitives
//
// The card's login page embeds a per-attempt challenge token. The browser
// proves knowledge of the password by posting MD5(user + password +
// challenge) alongside the form. The network round trips live in
// `session.rs`; this module holds the pure pieces.

use md5::{Digest, Md5};
use secrecy::SecretString;

use crate::error::Error;

/// Login form page (also served in place of any page while logged out).
pub const LOGIN_PAGE: &str = "/home.asp";

/// Form action of the login page.
pub const LOGIN_ENDPOINT: &str = "/delta/login";

const CHALLENGE_MARKER: &str = r#"name="Challenge""#;

/// Distance from the start of the marker to the token: the marker itself
/// plus ` value="`.
const CHALLENGE_OFFSET: usize = 24;

const CHALLENGE_LEN: usize = 8;

/// Label of the login button; the firmware rejects posts without it.
const SUBMIT_LABEL: &str = "      OK      ";

/// Only present on the login screen. There is no positive success marker.
const LOGIN_SCREEN_MARKER: &str = "login_title";

/// Result of a handshake that completed without transport faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The card served an authenticated page; the session cookie is live.
    Authenticated,
    /// The card served the login screen again (bad credentials).
    Rejected,
}

impl AuthOutcome {
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Extract the challenge token from the login page.
///
/// The token is the fixed-width slice at a constant byte offset from the
/// `name="Challenge"` marker. The card renders the input the same way on
/// every firmware seen so far, so the slice is taken as-is.
pub fn extract_challenge(page: &str) -> Result<&str, &'static str> {
    let marker = page
        .find(CHALLENGE_MARKER)
        .ok_or("challenge field not present")?;
    let start = marker + CHALLENGE_OFFSET;
    page.get(start..start + CHALLENGE_LEN)
        .ok_or("page ends before the challenge token")
}

/// `MD5(user + password + challenge)` as lowercase hex.
pub fn compute_response(user: &str, password: &str, challenge: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(user.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(challenge.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Form body for `POST /delta/login`.
pub(crate) fn login_form<'a>(
    user: &'a str,
    password: &'a str,
    challenge: &'a str,
    response: &'a str,
) -> [(&'static str, &'a str); 5] {
    [
        ("Username", user),
        ("password", password),
        ("Submitbtn", SUBMIT_LABEL),
        ("Challenge", challenge),
        ("Response", response),
    ]
}

/// Whether a page body is the login screen.
pub fn is_login_screen(body: &str) -> bool {
    body.contains(LOGIN_SCREEN_MARKER)
}

// ── Password prompting ───────────────────────────────────────────────

/// Source of a password when neither the caller nor the session has one.
pub trait PasswordPrompt: Send + Sync {
    fn prompt(&self, host: &str) -> Result<SecretString, Error>;
}

impl<F> PasswordPrompt for F
where
    F: Fn(&str) -> Result<SecretString, Error> + Send + Sync,
{
    fn prompt(&self, host: &str) -> Result<SecretString, Error> {
        self(host)
    }
}

/// Non-echoing terminal prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn prompt(&self, host: &str) -> Result<SecretString, Error> {
        rpassword::prompt_password(format!("Password for {host}: "))
            .map(SecretString::from)
            .map_err(Error::Prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<form name="login">
<input type="hidden" name="Challenge" value="ABCDEFGH">
<input type="hidden" name="Response" value="">
</form>"#;

    #[test]
    fn challenge_at_fixed_offset() {
        assert_eq!(extract_challenge(PAGE), Ok("ABCDEFGH"));
    }

    #[test]
    fn challenge_ignores_surrounding_content() {
        let page = format!(
            "<html><title>login_title</title>{}<script>var x = 1;</script>",
            r#"<input type="hidden" name="Challenge" value="1a2b3c4d" size=8>"#
        );
        assert_eq!(extract_challenge(&page), Ok("1a2b3c4d"));
    }

    #[test]
    fn challenge_slice_is_fixed_width() {
        // A longer token is truncated rather than read to the closing quote.
        let page = r#"name="Challenge" value="0123456789abcdef">"#;
        assert_eq!(extract_challenge(page), Ok("01234567"));
    }

    #[test]
    fn missing_or_truncated_challenge() {
        assert!(extract_challenge("<html>maintenance</html>").is_err());
        assert!(extract_challenge(r#"name="Challenge" value="AB"#).is_err());
    }

    #[test]
    fn response_is_lowercase_md5_hex() {
        // md5("adminpasswordABCDEFGH")
        let expected = format!("{:x}", Md5::digest(b"adminpasswordABCDEFGH"));
        let response = compute_response("admin", "password", "ABCDEFGH");
        assert_eq!(response, expected);
        assert_eq!(response.len(), 32);
        assert!(response.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn response_of_empty_input() {
        assert_eq!(
            compute_response("", "", ""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn login_form_fields() {
        let form = login_form("admin", "pw", "ABCDEFGH", "f00");
        assert_eq!(form[0], ("Username", "admin"));
        assert_eq!(form[2], ("Submitbtn", "      OK      "));
        assert_eq!(form[4], ("Response", "f00"));
    }

    #[test]
    fn closure_prompt() {
        use secrecy::ExposeSecret;

        let prompt = |host: &str| -> Result<SecretString, Error> {
            Ok(SecretString::from(format!("pw-for-{host}")))
        };
        let secret = prompt.prompt("ups1").ok();
        assert_eq!(
            secret.as_ref().map(|s| s.expose_secret().to_owned()),
            Some("pw-for-ups1".into())
        );
    }
}
