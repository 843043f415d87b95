//! Tag event handling.
//!
//! One inbound message = one candidate tag UID. The handler answers every
//! message with a verdict on the response topic and, for registered tags,
//! appends a wall-clock timestamp to the attendance log of the tag's label.
//! Attendance is keyed by label, not UID, so two tags registered under the
//! same label share one log.

use chrono::Local;
use tracing::info;

use crate::{error::AppError, store::Store};

pub const VALID: &str = "1";
pub const INVALID: &str = "0";

/// Verdict transport back to the reader devices.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    async fn publish(&self, payload: &str) -> Result<(), AppError>;
}

/// Handles one message from the tag topic. The payload is decoded
/// best-effort as UTF-8; there is no framing beyond the raw UID string.
/// The verdict goes out before the attendance write, matching what the
/// reader firmware expects.
pub async fn handle_tag_message<S: Store, P: Publisher>(
    store: &S,
    publisher: &P,
    payload: &[u8],
) -> Result<(), AppError> {
    let tag_id = String::from_utf8_lossy(payload);

    match store.label_of(&tag_id).await {
        Ok(label) => {
            info!(%tag_id, %label, "tag accepted");
            publisher.publish(VALID).await?;
            store.append_stamp(&label, &timestamp()).await?;
        }
        Err(AppError::NotFound) => {
            info!(%tag_id, "tag not in registry");
            publisher.publish(INVALID).await?;
        }
        Err(other) => return Err(other),
    }

    Ok(())
}

pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

fn timestamp() -> String {
    Local::now().format(STAMP_FORMAT).to_string()
}
