// Flash feedback - Success/error tint of the display clear color
//
// A notification (re)starts a countdown of FLASH_FRAMES frames. Each drawn
// frame consumes one tick of exactly one countdown: error first, then success.
// While a countdown runs the background behind the picture is tinted red or
// green; otherwise it is the neutral dark gray. Colors are given as displayed
// (sRGB encoded); sRGB render targets need them converted to linear.

/// Number of frames a flash stays visible
pub const FLASH_FRAMES: u32 = 20;

/// Neutral background color (RGBA)
pub const NEUTRAL_COLOR: [f64; 4] = [0.05, 0.05, 0.05, 1.0];

/// Background tint selected for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashTint {
    Neutral,
    Success,
    Error,
}

impl FlashTint {
    /// Clear color for this tint as displayed (RGBA, 0.0-1.0)
    pub fn clear_color(self) -> [f64; 4] {
        match self {
            FlashTint::Neutral => NEUTRAL_COLOR,
            FlashTint::Success => [0.05, 0.7, 0.05, 1.0],
            FlashTint::Error => [0.7, 0.05, 0.05, 1.0],
        }
    }

    /// Clear color for a render target
    ///
    /// An sRGB target encodes the linear clear value on write, so the color
    /// channels are decoded first. Alpha stays linear.
    pub fn target_clear_color(self, srgb_target: bool) -> [f64; 4] {
        let [r, g, b, a] = self.clear_color();
        if srgb_target {
            [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
        } else {
            [r, g, b, a]
        }
    }
}

/// Decode one sRGB channel value to linear
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Countdown state for success and error flashes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashFeedback {
    success_frames: u32,
    error_frames: u32,
}

impl FlashFeedback {
    /// Create an idle flash state
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the success flash
    pub fn notify_success(&mut self) {
        self.success_frames = FLASH_FRAMES;
    }

    /// Restart the error flash
    pub fn notify_error(&mut self) {
        self.error_frames = FLASH_FRAMES;
    }

    /// Advance by one drawn frame and return the tint to use for it
    pub fn next_frame(&mut self) -> FlashTint {
        if self.error_frames > 0 {
            self.error_frames -= 1;
            FlashTint::Error
        } else if self.success_frames > 0 {
            self.success_frames -= 1;
            FlashTint::Success
        } else {
            FlashTint::Neutral
        }
    }

    /// Remaining success frames
    pub fn success_frames(&self) -> u32 {
        self.success_frames
    }

    /// Remaining error frames
    pub fn error_frames(&self) -> u32 {
        self.error_frames
    }

    /// True if either countdown is running
    pub fn is_active(&self) -> bool {
        self.success_frames > 0 || self.error_frames > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_neutral() {
        let mut flash = FlashFeedback::new();
        assert_eq!(flash.next_frame(), FlashTint::Neutral);
        assert!(!flash.is_active());
    }

    #[test]
    fn test_success_lasts_exactly_flash_frames() {
        let mut flash = FlashFeedback::new();
        flash.notify_success();
        for _ in 0..FLASH_FRAMES {
            assert_eq!(flash.next_frame(), FlashTint::Success);
        }
        assert_eq!(flash.next_frame(), FlashTint::Neutral);
    }

    #[test]
    fn test_error_wins_even_when_requested_first() {
        let mut flash = FlashFeedback::new();
        flash.notify_error();
        flash.notify_success();

        for _ in 0..FLASH_FRAMES {
            assert_eq!(flash.next_frame(), FlashTint::Error);
        }
        // The success countdown was not consumed while the error showed
        assert_eq!(flash.success_frames(), FLASH_FRAMES);
        for _ in 0..FLASH_FRAMES {
            assert_eq!(flash.next_frame(), FlashTint::Success);
        }
        assert_eq!(flash.next_frame(), FlashTint::Neutral);
    }

    #[test]
    fn test_notify_restarts_instead_of_accumulating() {
        let mut flash = FlashFeedback::new();
        flash.notify_success();
        for _ in 0..15 {
            flash.next_frame();
        }
        assert_eq!(flash.success_frames(), 5);

        flash.notify_success();
        assert_eq!(flash.success_frames(), FLASH_FRAMES);
        flash.notify_success();
        assert_eq!(flash.success_frames(), FLASH_FRAMES);
    }

    #[test]
    fn test_error_during_success_interrupts_it() {
        let mut flash = FlashFeedback::new();
        flash.notify_success();
        flash.next_frame();
        flash.notify_error();
        assert_eq!(flash.next_frame(), FlashTint::Error);
        assert_eq!(flash.success_frames(), FLASH_FRAMES - 1);
    }

    #[test]
    fn test_srgb_target_gets_linear_clear_color() {
        let linear = FlashTint::Neutral.target_clear_color(true);
        assert!((linear[0] - 0.003936).abs() < 1e-5);
        assert_eq!(linear[3], 1.0);

        // Encoding the linear value again lands on the displayed 13/255
        let encoded = 1.055 * linear[0].powf(1.0 / 2.4) - 0.055;
        assert_eq!((encoded * 255.0).round() as u8, 13);

        assert_eq!(
            FlashTint::Error.target_clear_color(false),
            FlashTint::Error.clear_color()
        );
    }

    #[test]
    fn test_srgb_to_linear_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-12);
        assert!((srgb_to_linear(0.04) - 0.04 / 12.92).abs() < 1e-12);
    }

    #[test]
    fn test_tint_colors() {
        assert_eq!(FlashTint::Neutral.clear_color(), NEUTRAL_COLOR);
        let red = FlashTint::Error.clear_color();
        assert!(red[0] > red[1] && red[0] > red[2]);
        let green = FlashTint::Success.clear_color();
        assert!(green[1] > green[0] && green[1] > green[2]);
    }
}
