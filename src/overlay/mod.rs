// Overlay module - Time-driven affordances drawn on top of the picture
//
// This module provides:
// - Flash feedback: success/error tint of the display clear color
// - Mute icon: blinking speaker-off indicator while audio is suspended

pub mod flash;
pub mod icon;

pub use flash::{srgb_to_linear, FlashFeedback, FlashTint, FLASH_FRAMES, NEUTRAL_COLOR};
pub use icon::{blink_alpha, decode_icon, IconBitmap, IconPlacement, MuteIndicator, PackedIcon};
