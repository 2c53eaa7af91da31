// Overlay behavior over frame sequences
//
// Flash countdowns and the mute icon blink are frame driven; these tests
// replay a run of frames the way the presenter consumes them.

use emu_gfx::display::Dimension;
use emu_gfx::overlay::{blink_alpha, FlashFeedback, FlashTint, MuteIndicator, FLASH_FRAMES};

fn replay(flash: &mut FlashFeedback, frames: u32) -> Vec<FlashTint> {
    (0..frames).map(|_| flash.next_frame()).collect()
}

#[test]
fn test_simultaneous_flashes_show_error_then_success() {
    let mut flash = FlashFeedback::new();
    flash.notify_success();
    flash.notify_error();

    let tints = replay(&mut flash, FLASH_FRAMES * 2 + 5);
    let n = FLASH_FRAMES as usize;
    assert!(tints[..n].iter().all(|&t| t == FlashTint::Error));
    assert!(tints[n..2 * n].iter().all(|&t| t == FlashTint::Success));
    assert!(tints[2 * n..].iter().all(|&t| t == FlashTint::Neutral));
}

#[test]
fn test_error_mid_success_delays_remaining_success() {
    let mut flash = FlashFeedback::new();
    flash.notify_success();
    let before = replay(&mut flash, 5);
    assert!(before.iter().all(|&t| t == FlashTint::Success));

    flash.notify_error();
    let tints = replay(&mut flash, FLASH_FRAMES + 15 + 1);
    let n = FLASH_FRAMES as usize;
    assert!(tints[..n].iter().all(|&t| t == FlashTint::Error));
    assert!(tints[n..n + 15].iter().all(|&t| t == FlashTint::Success));
    assert_eq!(tints[n + 15], FlashTint::Neutral);
}

#[test]
fn test_repeated_success_requests_extend_nothing() {
    let mut flash = FlashFeedback::new();
    for _ in 0..10 {
        flash.notify_success();
    }
    let tints = replay(&mut flash, FLASH_FRAMES + 1);
    let shown = tints.iter().filter(|&&t| t == FlashTint::Success).count();
    assert_eq!(shown, FLASH_FRAMES as usize);
}

#[test]
fn test_blink_period_is_64_frames() {
    let visible: Vec<bool> = (0..128u64).map(|f| blink_alpha(f) > 0.0).collect();
    assert!(visible[..32].iter().all(|&v| v));
    assert!(visible[32..64].iter().all(|&v| !v));
    assert!(visible[64..96].iter().all(|&v| v));
    assert!(visible[96..].iter().all(|&v| !v));
}

#[test]
fn test_mute_icon_tracks_canvas_and_audio() {
    let indicator = MuteIndicator::new();
    let canvas = Dimension::new(640, 480);

    assert!(indicator.placement(canvas, false, 0).is_none());

    let shown = indicator.placement(canvas, true, 0).unwrap();
    assert_eq!((shown.x0, shown.y0), (580.0, 10.0));
    assert_eq!((shown.x1, shown.y1), (630.0, 60.0));
    assert_eq!(shown.alpha, 1.0);

    let hidden = indicator.placement(canvas, true, 40).unwrap();
    assert_eq!(hidden.alpha, 0.0);

    // Follows the right edge after a resize
    let wide = indicator.placement(Dimension::new(1000, 480), true, 0).unwrap();
    assert_eq!(wide.x0, 940.0);
}

#[test]
fn test_mute_icon_has_transparent_background() {
    let indicator = MuteIndicator::new();
    let bitmap = indicator.bitmap();
    let mut opaque = 0;
    let mut transparent = 0;
    for y in 0..bitmap.size().height {
        for x in 0..bitmap.size().width {
            let [r, g, b, a] = bitmap.pixel(x, y);
            assert_eq!((r, g, b), (0xFF, 0xFF, 0xFF));
            match a {
                0xFF => opaque += 1,
                0x00 => transparent += 1,
                other => panic!("unexpected alpha {}", other),
            }
        }
    }
    assert!(opaque > 0);
    assert!(transparent > opaque);
}
