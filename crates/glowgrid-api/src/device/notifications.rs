// Notification endpoints: post, queue inspection, dismissal.

use crate::device::DeviceClient;
use crate::device::models::{Notification, NotifyAck};
use crate::error::Error;

impl DeviceClient {
    /// Send a notification; returns the queue id the device assigned.
    ///
    /// Only failures classified as transient are retried, and the
    /// protocol gives no idempotency guarantee: a timed-out attempt that
    /// is retried, or a call cancelled mid-flight, may still have queued
    /// the notification. Treat those outcomes as unknown, not rolled
    /// back.
    pub async fn notify(&self, notification: &Notification) -> Result<i64, Error> {
        if notification.model.frames.is_empty() {
            return Err(Error::InvalidRequest(
                "notification must contain at least one frame",
            ));
        }
        let ack: NotifyAck = self
            .transport()
            .post("api/v2/device/notifications", notification)
            .await?;
        Ok(ack.success.id)
    }

    /// The notification queue, highest priority first.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, Error> {
        self.transport().get("api/v2/device/notifications").await
    }

    /// One queued notification by id.
    pub async fn get_notification(&self, notification_id: i64) -> Result<Notification, Error> {
        self.transport()
            .get(&format!("api/v2/device/notifications/{notification_id}"))
            .await
    }

    /// The notification currently on screen, if any. The device answers
    /// `{}` when nothing is showing.
    pub async fn current_notification(&self) -> Result<Option<Notification>, Error> {
        self.transport()
            .get_optional("api/v2/device/notifications/current")
            .await
    }

    /// Remove a notification from the queue, dismissing it if visible.
    ///
    /// Dismissing an id that is already gone surfaces
    /// [`Error::NotFound`] so racing callers can detect it.
    pub async fn dismiss_notification(&self, notification_id: i64) -> Result<(), Error> {
        self.transport()
            .delete(&format!("api/v2/device/notifications/{notification_id}"))
            .await
    }

    /// Dismiss the notification currently on screen, if there is one.
    pub async fn dismiss_current_notification(&self) -> Result<(), Error> {
        if let Some(notification) = self.current_notification().await? {
            if let Some(id) = notification.notification_id {
                self.dismiss_notification(id).await?;
            }
        }
        Ok(())
    }

    /// Dismiss every queued notification, newest first so earlier
    /// entries are not promoted onto the screen mid-sweep.
    pub async fn dismiss_all_notifications(&self) -> Result<(), Error> {
        let mut notifications = self.list_notifications().await?;
        notifications.reverse();
        for notification in notifications {
            if let Some(id) = notification.notification_id {
                self.dismiss_notification(id).await?;
            }
        }
        Ok(())
    }
}
