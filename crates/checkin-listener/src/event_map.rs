//! Mapping Telegram updates onto session events.

use checkin_core::InboundEvent;
use telegram_channel::Update;

/// Convert an update into an inbound session event.
///
/// Returns `None` for updates the bot should not react to at all
/// (no message, no sender, or a message from another bot). Everything
/// else maps to an event; non-location, non-command messages become
/// invalid-payload submissions so the session can count them.
pub fn to_inbound_event(update: &Update) -> Option<InboundEvent> {
    let message = update.message.as_ref()?;
    let from = message.from.as_ref()?;
    if from.is_bot {
        return None;
    }

    let user_id = from.id.to_string();

    if let Some(location) = message.location {
        return Some(InboundEvent::location(
            user_id,
            location.latitude,
            location.longitude,
        ));
    }

    match message.text.as_deref().map(command_of) {
        Some(Some("/start")) => Some(InboundEvent::entry(user_id, from.display_name())),
        Some(Some("/checkin")) => Some(InboundEvent::checkin(user_id)),
        Some(Some("/cancel")) => Some(InboundEvent::cancel(user_id)),
        // Unknown commands, plain text, stickers, photos: no usable
        // location payload.
        _ => Some(InboundEvent::invalid_payload(user_id)),
    }
}

/// Extract the leading command from message text, stripping any
/// `@botname` suffix (`/checkin@attendance_bot` matches `/checkin`).
fn command_of(text: &str) -> Option<&str> {
    let first = text.trim().split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    Some(first.split('@').next().unwrap_or(first))
}
