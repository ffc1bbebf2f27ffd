const API_URL: &str = "CAMWATCH_API_URL";

/// Backend URL from the environment, if set and non-empty
pub fn get_api_url() -> Option<String> {
    let url_from_env = std::env::var(API_URL);
    url_from_env.ok().filter(|url| !url.trim().is_empty())
}

const ALERT_EMAIL: &str = "EMAIL_USER";

/// Address the backend sends security alerts to
///
/// Only displayed by the client; the backend reads the same variable.
pub fn get_alert_email() -> Option<String> {
    let email_from_env = std::env::var(ALERT_EMAIL);
    email_from_env.ok().filter(|email| !email.trim().is_empty())
}
