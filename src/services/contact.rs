//! Host contact link building
//!
//! The API never sends messages. For a booking it only returns a
//! ready-to-open WhatsApp link so the attendee can reach the host
//! themselves; message delivery is entirely the client's business.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::utils::errors::{AppError, Result};

fn non_digits() -> &'static Regex {
    static NON_DIGITS: OnceLock<Regex> = OnceLock::new();
    NON_DIGITS.get_or_init(|| Regex::new(r"\D").expect("static regex"))
}

/// Everything needed to build the default contact message
#[derive(Debug, Clone)]
pub struct ContactLinkRequest<'a> {
    pub phone_number: &'a str,
    pub event_name: &'a str,
    pub event_date: &'a str,
    pub host_name: &'a str,
    pub number_of_people: i32,
    pub custom_message: Option<&'a str>,
}

/// Strip a phone number down to its digits
pub fn clean_phone_number(raw: &str) -> String {
    non_digits().replace_all(raw, "").into_owned()
}

/// Whether a number looks usable as a WhatsApp target (10-15 digits)
pub fn is_valid_whatsapp_number(raw: &str) -> bool {
    let digits = clean_phone_number(raw);
    (10..=15).contains(&digits.len())
}

/// Build a wa.me link carrying a prefilled message to the host
pub fn whatsapp_url(request: &ContactLinkRequest<'_>) -> Result<Url> {
    if !is_valid_whatsapp_number(request.phone_number) {
        return Err(AppError::InvalidInput(format!(
            "Not a usable WhatsApp number: {}",
            request.phone_number
        )));
    }

    let phone = clean_phone_number(request.phone_number);

    let default_message = format!(
        "Hi {}, I'd like to join your event \"{}\" on {}. I've reserved {} {}.",
        request.host_name,
        request.event_name,
        request.event_date,
        request.number_of_people,
        if request.number_of_people == 1 { "spot" } else { "spots" },
    );
    let message = request.custom_message.unwrap_or(&default_message);

    let url = Url::parse(&format!(
        "https://wa.me/{}?text={}",
        phone,
        urlencoding::encode(message)
    ))?;

    Ok(url)
}
