// App endpoints: inventory, foreground switching, action passthrough.

use std::collections::HashMap;

use crate::device::DeviceClient;
use crate::device::models::{App, AppAction};
use crate::error::Error;

impl DeviceClient {
    /// All installed apps, keyed by package name.
    pub async fn list_apps(&self) -> Result<HashMap<String, App>, Error> {
        self.transport().get("api/v2/device/apps").await
    }

    /// One installed app by package name.
    pub async fn get_app(&self, package: &str) -> Result<App, Error> {
        self.transport()
            .get(&format!("api/v2/device/apps/{package}"))
            .await
    }

    /// Switch the display to the next app. App order is controlled by
    /// the owner through the companion app.
    pub async fn next_app(&self) -> Result<(), Error> {
        self.transport().put_unit("api/v2/device/apps/next").await
    }

    /// Switch the display to the previous app.
    pub async fn previous_app(&self) -> Result<(), Error> {
        self.transport().put_unit("api/v2/device/apps/prev").await
    }

    /// Invoke an app action, e.g. switching a clock face. The payload is
    /// opaque to this client beyond requiring primitive parameter
    /// values.
    pub async fn app_action(&self, package: &str, action: &AppAction) -> Result<(), Error> {
        if let Some(params) = &action.params {
            if params.values().any(|v| v.is_object() || v.is_array()) {
                return Err(Error::InvalidRequest(
                    "action params must be JSON primitives",
                ));
            }
        }
        self.transport()
            .post_unit(&format!("api/v2/device/apps/{package}/actions"), action)
            .await
    }
}
