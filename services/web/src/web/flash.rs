//! services/web/src/web/flash.rs
//!
//! One-shot flash messages carried across the POST/redirect/GET cycle in a
//! cookie: set when a handler redirects, consumed by the next page render.

use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

const FLASH_COOKIE: &str = "deepchat_flash";

/// One pending user-visible status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

fn read_pending(cookies: &Cookies) -> Vec<Flash> {
    cookies
        .get(FLASH_COOKIE)
        .and_then(|c| urlencoding::decode(c.value()).ok().map(|s| s.into_owned()))
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn write_pending(cookies: &Cookies, pending: &[Flash]) {
    let json = serde_json::to_string(pending).unwrap_or_default();
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(&json).into_owned()))
        .path("/")
        .http_only(true)
        .build();
    cookies.add(cookie);
}

/// Queues a message for the next rendered page.
pub fn flash(cookies: &Cookies, category: &str, message: &str) {
    let mut pending = read_pending(cookies);
    pending.push(Flash {
        category: category.to_string(),
        message: message.to_string(),
    });
    write_pending(cookies, &pending);
}

/// Takes all pending messages, clearing the cookie.
pub fn take_flashes(cookies: &Cookies) -> Vec<Flash> {
    let pending = read_pending(cookies);
    if !pending.is_empty() {
        cookies.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
    }
    pending
}
