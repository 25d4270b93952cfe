//! Pre-defined gesture sequences and the muscle activity behind each pose

use armlog_core::{Pose, EMG_CHANNELS};
use serde::{Deserialize, Serialize};

/// Sequence of poses the simulated wearer performs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GesturePattern {
    /// Arm relaxed the whole time
    Idle,
    /// One pose held indefinitely
    Hold { pose: Pose },
    /// Poses repeated in order, each held for `hold_secs`
    Cycle { poses: Vec<Pose>, hold_secs: f32 },
    /// Explicit (start time in seconds, pose) steps, sorted by start time
    Scripted { steps: Vec<(f32, Pose)> },
}

impl GesturePattern {
    /// Pose being performed `time` seconds after the band connected
    pub fn pose_at_time(&self, time: f32) -> Pose {
        match self {
            GesturePattern::Idle => Pose::Rest,

            GesturePattern::Hold { pose } => *pose,

            GesturePattern::Cycle { poses, hold_secs } => {
                if poses.is_empty() || *hold_secs <= 0.0 {
                    return Pose::Rest;
                }
                let slot = (time.max(0.0) / hold_secs) as usize;
                poses[slot % poses.len()]
            }

            GesturePattern::Scripted { steps } => steps
                .iter()
                .take_while(|(start, _)| *start <= time)
                .last()
                .map(|(_, pose)| *pose)
                .unwrap_or(Pose::Rest),
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            GesturePattern::Idle => "Relaxed arm",
            GesturePattern::Hold { .. } => "Single held pose",
            GesturePattern::Cycle { .. } => "Repeating gesture cycle",
            GesturePattern::Scripted { .. } => "Scripted gestures",
        }
    }

    /// Unlock with a double tap, then work through every gesture with rests between
    pub fn demo_cycle() -> Self {
        GesturePattern::Cycle {
            poses: vec![
                Pose::DoubleTap,
                Pose::Rest,
                Pose::Fist,
                Pose::Rest,
                Pose::WaveIn,
                Pose::Rest,
                Pose::WaveOut,
                Pose::Rest,
                Pose::FingersSpread,
                Pose::Rest,
            ],
            hold_secs: 1.5,
        }
    }

    /// Named preset patterns, selectable from the command line
    pub fn presets() -> Vec<(&'static str, GesturePattern)> {
        vec![
            ("idle", GesturePattern::Idle),
            ("demo", GesturePattern::demo_cycle()),
            ("grip", GesturePattern::Hold { pose: Pose::Fist }),
            ("swipes", GesturePattern::Cycle {
                poses: vec![Pose::DoubleTap, Pose::WaveIn, Pose::Rest, Pose::WaveOut, Pose::Rest],
                hold_secs: 0.8,
            }),
            ("unlock-then-spread", GesturePattern::Scripted {
                steps: vec![(0.5, Pose::DoubleTap), (1.0, Pose::Rest), (2.0, Pose::FingersSpread), (4.0, Pose::Rest)],
            }),
        ]
    }

    /// Look up a preset by name (case-insensitive)
    pub fn preset(name: &str) -> Option<GesturePattern> {
        Self::presets()
            .into_iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|(_, pattern)| pattern)
    }
}

impl Default for GesturePattern {
    fn default() -> Self {
        GesturePattern::demo_cycle()
    }
}

/// Muscle activity behind a pose: overall level and per-electrode weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuscleActivity {
    /// 0.0 (relaxed) to 1.0 (maximal contraction)
    pub level: f32,
    pub channel_weights: [f32; EMG_CHANNELS],
}

/// Activation profile for a pose. Channels 0-3 sit over the flexors,
/// 4-7 over the extensors.
pub fn activation_for(pose: Pose) -> MuscleActivity {
    let (level, channel_weights) = match pose {
        Pose::Rest | Pose::Unknown => (0.05, [1.0; EMG_CHANNELS]),
        Pose::Fist => (0.8, [1.0, 1.0, 0.9, 0.9, 0.7, 0.7, 0.8, 0.8]),
        Pose::WaveIn => (0.6, [1.0, 1.0, 0.8, 0.6, 0.2, 0.1, 0.1, 0.2]),
        Pose::WaveOut => (0.6, [0.2, 0.1, 0.1, 0.2, 0.6, 0.8, 1.0, 1.0]),
        Pose::FingersSpread => (0.5, [0.3, 0.5, 0.3, 0.5, 1.0, 0.8, 1.0, 0.8]),
        Pose::DoubleTap => (0.4, [0.6, 0.8, 1.0, 0.8, 0.6, 0.4, 0.4, 0.4]),
    };
    MuscleActivity {
        level,
        channel_weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_around() {
        let pattern = GesturePattern::Cycle {
            poses: vec![Pose::Fist, Pose::Rest],
            hold_secs: 1.0,
        };
        assert_eq!(pattern.pose_at_time(0.0), Pose::Fist);
        assert_eq!(pattern.pose_at_time(1.5), Pose::Rest);
        assert_eq!(pattern.pose_at_time(2.1), Pose::Fist);
        assert_eq!(pattern.pose_at_time(-1.0), Pose::Fist);
    }

    #[test]
    fn test_degenerate_cycle_rests() {
        let pattern = GesturePattern::Cycle { poses: vec![], hold_secs: 1.0 };
        assert_eq!(pattern.pose_at_time(3.0), Pose::Rest);
        let pattern = GesturePattern::Cycle { poses: vec![Pose::Fist], hold_secs: 0.0 };
        assert_eq!(pattern.pose_at_time(3.0), Pose::Rest);
    }

    #[test]
    fn test_scripted_steps() {
        let pattern = GesturePattern::Scripted {
            steps: vec![(1.0, Pose::WaveIn), (2.0, Pose::WaveOut)],
        };
        assert_eq!(pattern.pose_at_time(0.5), Pose::Rest);
        assert_eq!(pattern.pose_at_time(1.0), Pose::WaveIn);
        assert_eq!(pattern.pose_at_time(9.0), Pose::WaveOut);
    }

    #[test]
    fn test_activation_profiles() {
        for pose in Pose::ALL {
            let activity = activation_for(pose);
            assert!((0.0..=1.0).contains(&activity.level));
            assert!(activity.channel_weights.iter().all(|w| (0.0..=1.0).contains(w)));
        }
        assert!(activation_for(Pose::Fist).level > activation_for(Pose::Rest).level);
    }

    #[test]
    fn test_pattern_json_format() {
        let json = r#"{ "type": "cycle", "poses": ["fist", "rest"], "hold_secs": 0.5 }"#;
        let pattern: GesturePattern = serde_json::from_str(json).unwrap();
        assert_eq!(pattern.pose_at_time(0.6), Pose::Rest);

        let json = serde_json::to_string(&GesturePattern::Hold { pose: Pose::WaveOut }).unwrap();
        assert_eq!(json, r#"{"type":"hold","pose":"waveOut"}"#);
    }

    #[test]
    fn test_preset_lookup() {
        for (name, pattern) in GesturePattern::presets() {
            assert_eq!(GesturePattern::preset(name), Some(pattern));
        }
        assert_eq!(GesturePattern::preset("GRIP"), Some(GesturePattern::Hold { pose: Pose::Fist }));
        assert_eq!(GesturePattern::preset("demo"), Some(GesturePattern::default()));
        assert_eq!(GesturePattern::preset("juggling"), None);
    }
}
