use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};
use crate::models::WireStatus;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Authenticated portal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub issued_at: i64,
}

/// Keyed MAC over the session payload
fn session_mac(secret: &str, email: &str, issued_at: i64) -> AppResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Config(format!("Invalid session secret: {}", e)))?;
    mac.update(format!("dealroom_session:{}:{}", email, issued_at).as_bytes());
    Ok(mac)
}

/// Create a session token for a contact
///
/// Format: `<base64url(email)>.<issued_at>.<hex tag>`
pub fn create_session_token(secret: &str, email: &str, issued_at: i64) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    let tag = session_mac(secret, &email, issued_at)?.finalize().into_bytes();
    Ok(format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(email.as_bytes()),
        issued_at,
        hex::encode(tag)
    ))
}

/// Verify a session token at time `now`
pub fn verify_session_token(config: &SessionConfig, token: &str, now: i64) -> AppResult<Session> {
    let mut parts = token.trim().splitn(3, '.');
    let (Some(email_part), Some(issued_part), Some(tag)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(AppError::Unauthorized("Malformed session".to_string()));
    };

    let email = URL_SAFE_NO_PAD
        .decode(email_part)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| AppError::Unauthorized("Malformed session".to_string()))?;

    let issued_at = issued_part
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("Malformed session".to_string()))?;

    let tag = hex::decode(tag)
        .map_err(|_| AppError::Unauthorized("Malformed session".to_string()))?;
    session_mac(&config.secret, &email, issued_at)?
        .verify_slice(&tag)
        .map_err(|_| AppError::Unauthorized("Invalid session signature".to_string()))?;

    if issued_at > now + 60 {
        return Err(AppError::Unauthorized("Session issued in the future".to_string()));
    }
    if now - issued_at > config.max_age_secs {
        return Err(AppError::Unauthorized("Session expired".to_string()));
    }

    Ok(Session { email, issued_at })
}

fn wire_mac(secret: &str, email: &str, file_name: &str, status: WireStatus) -> AppResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Config(format!("Invalid session secret: {}", e)))?;
    mac.update(
        format!(
            "dealroom_wire:{}:{}:{}",
            email.trim().to_lowercase(),
            file_name,
            status.as_str()
        )
        .as_bytes(),
    );
    Ok(mac)
}

/// Sign a wire verification outcome for one contact and file.
///
/// Format: `<status>.<hex tag>`
pub fn sign_wire_status(
    secret: &str,
    email: &str,
    file_name: &str,
    status: WireStatus,
) -> AppResult<String> {
    let tag = wire_mac(secret, email, file_name, status)?.finalize().into_bytes();
    Ok(format!("{}.{}", status.as_str(), hex::encode(tag)))
}

/// Status carried by a wire token, if it was signed for this contact and file
pub fn verify_wire_token(secret: &str, email: &str, file_name: &str, token: &str) -> Option<WireStatus> {
    let (status, tag) = token.trim().split_once('.')?;
    let status = WireStatus::parse(status)?;
    let tag = hex::decode(tag).ok()?;
    wire_mac(secret, email, file_name, status)
        .ok()?
        .verify_slice(&tag)
        .ok()?;
    Some(status)
}

/// Pull a named cookie out of a `Cookie` header
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that stores a session
pub fn session_cookie(config: &SessionConfig, token: &str, secure: bool) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        config.cookie_name,
        token,
        config.max_age_secs,
        if secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that clears the session
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    )
}
