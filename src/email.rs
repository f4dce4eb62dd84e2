//! Outbound email notifications
//!
//! Contact-form submissions notify the agency inbox; newsletter signups and
//! bookings notify the customer. Handlers talk to the [`Notifier`] trait so
//! tests and SMTP-less deployments run against the logging implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::SmtpTransport;
use lettre::{Message, Transport};
use std::sync::Arc;

use crate::config::EmailConfig;
use crate::models::{Booking, ContactMessage, Tour};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Forward a contact-form message to the agency inbox
    async fn contact_received(&self, message: &ContactMessage) -> Result<()>;

    /// Welcome a new newsletter subscriber
    async fn newsletter_welcome(&self, email: &str) -> Result<()>;

    /// Confirm a booking to the customer
    async fn booking_confirmation(&self, booking: &Booking, tour: &Tour) -> Result<()>;
}

/// Build the notifier matching the configuration: SMTP when enabled,
/// logging otherwise
pub fn notifier_from_config(config: &EmailConfig) -> Arc<dyn Notifier> {
    if config.enabled {
        Arc::new(SmtpNotifier {
            config: config.clone(),
        })
    } else {
        Arc::new(LogNotifier)
    }
}

/// Delivers through an SMTP relay
pub struct SmtpNotifier {
    config: EmailConfig,
}

impl SmtpNotifier {
    fn create_mailer(&self) -> Result<SmtpTransport> {
        let username = self
            .config
            .smtp_username
            .clone()
            .context("Missing SMTP username")?;
        let password = self
            .config
            .smtp_password
            .clone()
            .context("Missing SMTP password")?;

        let credentials = Credentials::new(username, password);

        let mailer = SmtpTransport::relay(&self.config.smtp_relay)?
            .credentials(credentials)
            .build();

        Ok(mailer)
    }

    fn send(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let email = Message::builder()
            .from(
                self.config
                    .from_address
                    .parse()
                    .context("Failed to parse from address")?,
            )
            .to(to.parse().context("Failed to parse to address")?)
            .subject(subject)
            .body(body)?;

        let mailer = self.create_mailer()?;
        mailer.send(&email).context("Failed to send email")?;
        tracing::info!("Sent '{}' email to {}", subject, to);
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn contact_received(&self, message: &ContactMessage) -> Result<()> {
        self.send(
            &self.config.agency_inbox,
            &format!("Contact form: {}", message.subject),
            format!(
                "From: {} <{}>\n\n{}",
                message.name, message.email, message.message
            ),
        )
    }

    async fn newsletter_welcome(&self, email: &str) -> Result<()> {
        self.send(
            email,
            "Welcome to the Wayfarer newsletter",
            "Thanks for subscribing!\n\n\
             Once a month we send new tours, route notes, and early-bird \
             departures. Unsubscribe any time from the link in each issue."
                .to_string(),
        )
    }

    async fn booking_confirmation(&self, booking: &Booking, tour: &Tour) -> Result<()> {
        self.send(
            &booking.email,
            &format!("Booking {} received", booking.reference),
            format!(
                "Hi {},\n\n\
                 We received your booking for \"{}\".\n\n\
                 Reference: {}\n\
                 Departure: {}\n\
                 Travelers: {}\n\
                 Total: {}{:.2}\n\n\
                 Our team will confirm availability within one business day.",
                booking.name,
                tour.title,
                booking.reference,
                booking.departure_date,
                booking.travelers,
                booking.currency.symbol(),
                booking.total_price,
            ),
        )
    }
}

/// Logs instead of sending; the default in development and tests
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn contact_received(&self, message: &ContactMessage) -> Result<()> {
        tracing::info!(
            from = %message.email,
            subject = %message.subject,
            "email disabled; contact notification not sent"
        );
        Ok(())
    }

    async fn newsletter_welcome(&self, email: &str) -> Result<()> {
        tracing::info!(%email, "email disabled; newsletter welcome not sent");
        Ok(())
    }

    async fn booking_confirmation(&self, booking: &Booking, _tour: &Tour) -> Result<()> {
        tracing::info!(
            reference = %booking.reference,
            email = %booking.email,
            "email disabled; booking confirmation not sent"
        );
        Ok(())
    }
}
