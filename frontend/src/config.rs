
#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

/// Where waitlist signups are posted. Set `WAITLIST_WEBHOOK_URL` at build time
/// to point at the hosted webhook.
pub fn get_waitlist_webhook_url() -> String {
    match option_env!("WAITLIST_WEBHOOK_URL") {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("{}/api/waitlist", get_backend_url()),
    }
}

pub const GTM_ID: &str = "GTM-N3DS6GTF";

pub fn get_meta_pixel_id() -> &'static str {
    match option_env!("META_PIXEL_ID") {
        Some(id) if !id.is_empty() => id,
        _ => "2312331245956042",
    }
}

pub const CONSENT_STORAGE_KEY: &str = "gridgpt_consent_v1";
pub const CONSENT_VERSION: u32 = 1;

// Dispatched on `window` to open the cookie preferences modal.
pub const COOKIE_SETTINGS_EVENT: &str = "cookie:open-settings";
