use notify_rust::Notification;

/// Best-effort desktop notification. Tracking must keep working on
/// headless sessions, so delivery failures are only logged.
pub fn send(summary: &str, body: &str) {
    let result = Notification::new()
        .summary(summary)
        .body(body)
        .appname("tempo")
        .show();
    if let Err(e) = result {
        tracing::debug!("could not deliver notification: {e}");
    }
}
