//! Bodies of the emails the auth flows send

use super::EmailMessage;

/// Email asking a new user to confirm their address
pub fn verify_email(to: &str, url: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Verify your email address".to_string(),
        text: format!("Click on the link to verify your email address: {url}"),
        html: format!(
            "<h1>Verify your email address</h1>\
             <p>Click on the link below to verify your email address.</p>\
             <p><a href=\"{url}\">Verify email</a></p>"
        ),
    }
}

/// Email carrying a password reset link
pub fn password_reset_email(to: &str, url: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Password reset request".to_string(),
        text: format!(
            "You requested a password reset. Click on the link to reset your password: {url}"
        ),
        html: format!(
            "<h1>Password reset request</h1>\
             <p>You requested a password reset. The link expires in one hour.</p>\
             <p><a href=\"{url}\">Reset password</a></p>\
             <p>If you did not request this, you can ignore this email.</p>"
        ),
    }
}
