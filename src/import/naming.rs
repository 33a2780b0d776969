//! Raw frame file naming convention.
//!
//! | file                 | state        | index |
//! |----------------------|--------------|-------|
//! | `down_stand.png`     | `idle_down`  | 0     |
//! | `left_walk0.png`     | `walk_left`  | 0     |
//! | `left_walk12.png`    | `walk_left`  | 12    |
//! | `left_walk.png`      | `walk_left`  | 0     |

/// Which kind of pose a raw frame file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Idle,
    Walk,
}

impl Pose {
    fn prefix(self) -> &'static str {
        match self {
            Pose::Idle => "idle",
            Pose::Walk => "walk",
        }
    }
}

/// A file stem decoded according to the naming convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameName {
    pub pose: Pose,
    /// Lowercased facing, e.g. `left`.
    pub facing: String,
    /// Position within the state's frame sequence.
    pub index: u32,
}

impl FrameName {
    /// Manifest state name, e.g. `walk_left`.
    pub fn state(&self) -> String {
        format!("{}_{}", self.pose.prefix(), self.facing)
    }
}

/// Decode a file stem. Anything not following the convention is `None`.
pub fn parse_frame_name(stem: &str) -> Option<FrameName> {
    let (facing, action) = stem.split_once('_')?;
    if facing.is_empty() || !facing.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let facing = facing.to_ascii_lowercase();
    let action = action.to_ascii_lowercase();

    if action == "stand" {
        return Some(FrameName { pose: Pose::Idle, facing, index: 0 });
    }

    let digits = action.strip_prefix("walk")?;
    let index = if digits.is_empty() {
        0
    } else if digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()?
    } else {
        return None;
    };
    Some(FrameName { pose: Pose::Walk, facing, index })
}
