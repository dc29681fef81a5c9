//! Notification request model: wire parameters and target URL.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::SecretString;
use crate::error::InvalidColor;

/// Message color accepted by the room notification API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Yellow,
    Green,
    Red,
    Purple,
    Gray,
    Random,
}

impl Color {
    /// Lowercase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Red => "red",
            Color::Purple => "purple",
            Color::Gray => "gray",
            Color::Random => "random",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yellow" => Ok(Color::Yellow),
            "green" => Ok(Color::Green),
            "red" => Ok(Color::Red),
            "purple" => Ok(Color::Purple),
            "gray" => Ok(Color::Gray),
            "random" => Ok(Color::Random),
            other => Err(InvalidColor(other.to_string())),
        }
    }
}

/// A single notification to a room, ready for dispatch.
///
/// Constructed once per notification attempt from a resolved
/// authentication, populated with the chainable `with_*` setters, and
/// discarded after the HTTP call completes.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    api_url: String,
    token: SecretString,
    room_id: String,
    message: String,
    color: Color,
    notify: bool,
    html: bool,
    from: String,
    auth_test: bool,
}

impl NotificationRequest {
    pub fn new(
        api_url: impl Into<String>,
        token: SecretString,
        room_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            token,
            room_id: room_id.into(),
            message: message.into(),
            color: Color::default(),
            notify: false,
            html: false,
            from: String::new(),
            auth_test: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Switch the request into credential-test mode: the URL gains an
    /// `auth_test=true` query parameter and the expected status changes.
    pub fn with_auth_test(mut self, auth_test: bool) -> Self {
        self.auth_test = auth_test;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_notify(&self) -> bool {
        self.notify
    }

    pub fn is_html(&self) -> bool {
        self.html
    }

    /// Value of the `from` wire field (sender name shown in the room).
    pub fn sender(&self) -> &str {
        &self.from
    }

    pub fn is_auth_test(&self) -> bool {
        self.auth_test
    }

    /// Expected HTTP success status: 202 for a credential test, 204 for a
    /// normal send.
    pub fn expected_status(&self) -> u16 {
        if self.auth_test { 202 } else { 204 }
    }

    /// Target URL for the POST.
    ///
    /// `room_id` and `token` are interpolated as-is, without
    /// percent-encoding: both come from validated configuration and the
    /// wire contract expects them verbatim.
    pub fn target_url(&self) -> String {
        let mut url = format!(
            "{}/room/{}/notification?auth_token={}",
            self.api_url,
            self.room_id,
            self.token.expose()
        );
        if self.auth_test {
            url.push_str("&auth_test=true");
        }
        url
    }

    /// The five wire form fields, in the order the API expects them.
    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("message", self.message.clone()),
            ("color", self.color.as_str().to_string()),
            ("notify", self.notify.to_string()),
            (
                "message_format",
                if self.html { "html" } else { "text" }.to_string(),
            ),
            ("from", self.from.clone()),
        ]
    }
}
