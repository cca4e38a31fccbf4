use crate::{
    config::SmtpConfig,
    error::{Error, NotifyError},
    validate::SubmissionType,
};
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{info, warn};

const QUEUE_DEPTH: usize = 64;

#[derive(Debug)]
pub struct Notification {
    pub kind: SubmissionType,
    pub record_id: String,
    pub fields: BTreeMap<String, String>,
}

///Fire-and-forget handle. Sends are queued to a background worker; a full
///queue or a transport failure is logged and swallowed, never surfaced to
///the submitter.
#[derive(Clone)]
pub struct NotifyHandle {
    sender: Option<mpsc::Sender<Notification>>,
}

impl NotifyHandle {
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn notify(&self, notification: Notification) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(err) = sender.try_send(notification) {
            warn!("notification dropped: {}", err);
        }
    }
}

///Builds the SMTP transport and spawns the queue worker.
pub fn start(config: &SmtpConfig) -> Result<NotifyHandle, Error> {
    let transport: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
            .map_err(NotifyError::Transport)?
            .credentials(Credentials::new(
                config.username.to_owned(),
                config.password.to_owned(),
            ))
            .build();
    let sender_address: Mailbox = config
        .sender_address
        .parse()
        .map_err(NotifyError::Address)?;
    let recipient_address: Mailbox = config
        .recipient_address
        .parse()
        .map_err(NotifyError::Address)?;

    let (sender, mut receiver) = mpsc::channel::<Notification>(QUEUE_DEPTH);
    tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            match send(
                &transport,
                sender_address.to_owned(),
                recipient_address.to_owned(),
                &notification,
            )
            .await
            {
                Ok(()) => info!(
                    "notified for {} {}",
                    notification.kind, notification.record_id
                ),
                Err(err) => warn!(
                    "notification for {} {} failed: {}",
                    notification.kind, notification.record_id, err
                ),
            }
        }
    });

    Ok(NotifyHandle {
        sender: Some(sender),
    })
}

async fn send(
    transport: &AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    notification: &Notification,
) -> Result<(), Error> {
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(format!("New {} received", notification.kind))
        .body(render(notification))
        .map_err(NotifyError::MessageBuild)?;
    transport
        .send(message)
        .await
        .map_err(NotifyError::Transport)?;
    Ok(())
}

fn render(notification: &Notification) -> String {
    let mut body = format!(
        "New {} ({})\n\n",
        notification.kind, notification.record_id
    );
    for (name, value) in notification.fields.iter() {
        if !value.is_empty() {
            body.push_str(&format!("{}: {}\n", name, value));
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_handle_drops_notifications_quietly() {
        let handle = NotifyHandle::disabled();
        handle.notify(Notification {
            kind: SubmissionType::Rsvp,
            record_id: "abc".to_string(),
            fields: BTreeMap::new(),
        });
    }

    #[test]
    fn render_skips_empty_fields() {
        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        fields.insert("firstName".to_string(), "Ava".to_string());
        fields.insert("guestName".to_string(), String::new());
        let body = render(&Notification {
            kind: SubmissionType::Rsvp,
            record_id: "abc".to_string(),
            fields,
        });
        assert!(body.contains("firstName: Ava"));
        assert!(!body.contains("guestName"));
    }
}
