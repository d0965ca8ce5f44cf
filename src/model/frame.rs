// Animation frame selection

/// Which frame to show, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAndDuration {
    /// The index of the frame which should be shown.
    pub frame_index: usize,
    /// Milliseconds until the next frame is due. `0` means the frame never changes.
    pub frame_duration: u32,
}

/// Pick the frame shown `elapsed_ms` after an animation started.
///
/// Frame `i` covers `[cum_i, cum_i + delay_i)` of each period of `total_delay`
/// milliseconds. Single-frame cursors and cursors whose delays are all zero always
/// show frame 0.
pub fn select<I>(delays: I, total_delay: u32, elapsed_ms: u32) -> FrameAndDuration
where
    I: IntoIterator<Item = u32>,
    I::IntoIter: ExactSizeIterator,
{
    let delays = delays.into_iter();
    let still = FrameAndDuration {
        frame_index: 0,
        frame_duration: 0,
    };
    if delays.len() <= 1 || total_delay == 0 {
        return still;
    }

    let t = u64::from(elapsed_ms % total_delay);
    let mut cum = 0u64;
    let mut last = 0;
    for (i, delay) in delays.enumerate() {
        let end = cum + u64::from(delay);
        if t < end {
            return FrameAndDuration {
                frame_index: i,
                frame_duration: (end - t) as u32,
            };
        }
        cum = end;
        last = i;
    }

    // Only reachable when total_delay overstates the sum of the delays.
    FrameAndDuration {
        frame_index: last,
        frame_duration: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(delays: &[u32], elapsed: u32) -> usize {
        let total = delays.iter().sum();
        select(delays.iter().copied(), total, elapsed).frame_index
    }

    #[test]
    fn test_single_frame_is_always_zero() {
        for elapsed in [0, 1, 1_000_000] {
            assert_eq!(frame(&[0], elapsed), 0);
            assert_eq!(frame(&[250], elapsed), 0);
        }
    }

    #[test]
    fn test_three_frame_animation() {
        let delays = [100, 200, 150];
        assert_eq!(frame(&delays, 0), 0);
        assert_eq!(frame(&delays, 99), 0);
        assert_eq!(frame(&delays, 100), 1);
        assert_eq!(frame(&delays, 150), 1);
        assert_eq!(frame(&delays, 300), 2);
        assert_eq!(frame(&delays, 449), 2);
        assert_eq!(frame(&delays, 450), 0);
        assert_eq!(frame(&delays, 900), 0);
    }

    #[test]
    fn test_all_zero_delays_show_first_frame() {
        assert_eq!(frame(&[0, 0, 0], 0), 0);
        assert_eq!(frame(&[0, 0, 0], 12345), 0);
    }

    #[test]
    fn test_zero_delay_frame_is_skipped() {
        let delays = [100, 0, 100];
        assert_eq!(frame(&delays, 99), 0);
        assert_eq!(frame(&delays, 100), 2);
    }

    #[test]
    fn test_remaining_duration() {
        let delays = [100, 200, 150];
        let at = |elapsed| select(delays, 450, elapsed);
        assert_eq!(
            at(0),
            FrameAndDuration {
                frame_index: 0,
                frame_duration: 100
            }
        );
        assert_eq!(
            at(150),
            FrameAndDuration {
                frame_index: 1,
                frame_duration: 150
            }
        );
        assert_eq!(
            at(449),
            FrameAndDuration {
                frame_index: 2,
                frame_duration: 1
            }
        );
        assert_eq!(select([40], 40, 10).frame_duration, 0);
    }

    #[test]
    fn test_wraps_near_u32_max() {
        let delays = [100, 200, 150];
        // u32::MAX % 450 == 345
        assert_eq!(frame(&delays, u32::MAX), 2);
    }
}
